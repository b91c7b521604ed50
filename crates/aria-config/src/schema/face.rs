//! Facial feature configuration types: blinking, lip-sync and gaze.

use serde::{Deserialize, Serialize};

/// Blink controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub enabled: bool,
    /// Length of one close/open cycle in seconds.
    pub duration: f64,
    pub min_interval: f64,
    pub max_interval: f64,
    /// Expression names driven by the blink weight (case-insensitive).
    pub expressions: Vec<String>,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: 0.15,
            min_interval: 3.0,
            max_interval: 5.0,
            expressions: vec!["blink".into(), "blinkLeft".into(), "blinkRight".into()],
        }
    }
}

/// A mouth expression keyword and how strongly loudness drives it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MouthShape {
    pub keyword: String,
    pub gain: f64,
}

impl MouthShape {
    pub fn new(keyword: impl Into<String>, gain: f64) -> Self {
        Self {
            keyword: keyword.into(),
            gain,
        }
    }
}

/// Jaw-bone fallback for rigs without mouth expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JawConfig {
    pub enabled: bool,
    /// Jaw opening in radians at full loudness.
    pub max_angle: f64,
}

impl Default for JawConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_angle: 0.35,
        }
    }
}

/// Lip-sync analyser and mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    pub enabled: bool,
    /// FFT window length; yields `fft_size / 2` frequency bins.
    pub fft_size: u32,
    /// Time smoothing between consecutive spectra (0 = none).
    pub smoothing: f64,
    pub min_decibels: f64,
    pub max_decibels: f64,
    /// Loudness below this closes the mouth.
    pub threshold: f64,
    /// Loudness compression exponent; 1.0 is linear.
    pub curve: f64,
    /// Mouth blend rate as a multiple of `animation.blend_rate`.
    pub blend_rate_multiplier: f64,
    pub mouth_shapes: Vec<MouthShape>,
    pub jaw: JawConfig,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fft_size: 256,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            threshold: 0.05,
            curve: 1.0,
            blend_rate_multiplier: 5.0,
            mouth_shapes: vec![
                MouthShape::new("aa", 0.8),
                MouthShape::new("oh", 0.5),
                MouthShape::new("ou", 0.35),
                MouthShape::new("ee", 0.3),
                MouthShape::new("ih", 0.25),
            ],
            jaw: JawConfig::default(),
        }
    }
}

/// Camera used to unproject pointer positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub look_at: [f64; 3],
    /// Vertical field of view in degrees.
    pub fov: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.2, 2.8],
            look_at: [0.0, 0.2, 0.0],
            fov: 55.0,
        }
    }
}

/// Gaze controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    pub enabled: bool,
    /// Easing constant `k` in `1 - exp(-k * dt)`.
    pub ease_rate: f64,
    /// Distance along the pointer ray where the gaze target sits.
    pub distance: f64,
    pub max_yaw: f64,
    pub max_pitch: f64,
    pub camera: CameraConfig,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ease_rate: 5.0,
            distance: 2.0,
            max_yaw: 0.5,
            max_pitch: 0.5,
            camera: CameraConfig::default(),
        }
    }
}

//! Configuration schema types for Aria.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the tuning the avatar ships with.

mod animation;
mod audio;
mod characters;
mod face;
mod motion;
mod service;
mod system;

pub use animation::*;
pub use audio::*;
pub use characters::*;
pub use face::*;
pub use motion::*;
pub use service::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Aria.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AriaConfig {
    pub animation: AnimationConfig,
    pub blink: BlinkConfig,
    pub lipsync: LipSyncConfig,
    pub gaze: GazeConfig,
    pub idle: IdleConfig,
    pub pose: PoseConfig,
    pub clips: ClipsConfig,
    pub audio: AudioConfig,
    pub characters: CharactersConfig,
    pub service: ServiceConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aria_common::Emotion;

    #[test]
    fn default_animation_tuning() {
        let config = AriaConfig::default();
        assert!((config.animation.blend_rate - 3.0).abs() < f64::EPSILON);
        assert_eq!(
            config.animation.emotions.expression_for(Emotion::Surprised),
            "Surprised"
        );
        assert_eq!(config.animation.emotions.expression_for(Emotion::Happy), "happy");
        assert_eq!(config.animation.emotions.expressions().count(), 5);
    }

    #[test]
    fn default_blink_timing() {
        let config = AriaConfig::default();
        assert!((config.blink.duration - 0.15).abs() < f64::EPSILON);
        assert!((config.blink.min_interval - 3.0).abs() < f64::EPSILON);
        assert!((config.blink.max_interval - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.blink.expressions, vec!["blink", "blinkLeft", "blinkRight"]);
    }

    #[test]
    fn default_lipsync_analyser() {
        let config = AriaConfig::default();
        assert_eq!(config.lipsync.fft_size, 256);
        assert!((config.lipsync.smoothing - 0.8).abs() < f64::EPSILON);
        assert!((config.lipsync.threshold - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.lipsync.mouth_shapes.len(), 5);
        assert_eq!(config.lipsync.mouth_shapes[0], MouthShape::new("aa", 0.8));
        assert!((config.lipsync.jaw.max_angle - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn default_gaze_bounds() {
        let config = AriaConfig::default();
        assert!((config.gaze.max_yaw - 0.5).abs() < f64::EPSILON);
        assert!((config.gaze.max_pitch - 0.5).abs() < f64::EPSILON);
        assert!((config.gaze.distance - 2.0).abs() < f64::EPSILON);
        assert!((config.gaze.camera.fov - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_characters() {
        let config = AriaConfig::default();
        assert_eq!(config.characters.default, "test");
        assert!(config.characters.find("test").is_some());
        let jinyoung = config.characters.find("jinyoung").unwrap();
        assert_eq!(jinyoung.driver, DriverKind::Clips);
        assert!(config.characters.find("nobody").is_none());
    }

    #[test]
    fn default_service() {
        let config = AriaConfig::default();
        assert_eq!(config.service.mode, ServiceMode::Endpoint);
        assert_eq!(config.service.chat_model, "gpt-4o-mini");
        assert_eq!(config.service.voice, "nova");
        assert!(config.service.fallback_text.starts_with("Sorry"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AriaConfig = toml::from_str(
            r#"
[blink]
duration = 0.2

[pose]
mode = "smooth"
"#,
        )
        .unwrap();
        assert!((config.blink.duration - 0.2).abs() < f64::EPSILON);
        assert!((config.blink.min_interval - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.pose.mode, PoseMode::Smooth);
        assert_eq!(config.audio.output, OutputKind::Device);
    }

    #[test]
    fn clip_groups_parse_from_toml() {
        let config: AriaConfig = toml::from_str(
            r#"
[[clips.groups]]
name = "dance"
triggers = ["dance", "party"]
priority = 3
candidates = [{ clip = "Dance", weight = 2.0 }, { clip = "Spin" }]
"#,
        )
        .unwrap();
        assert_eq!(config.clips.groups.len(), 1);
        let group = &config.clips.groups[0];
        assert_eq!(group.priority, 3);
        assert_eq!(group.candidates[1], ClipCandidate::new("Spin", 1.0));
    }

    #[test]
    fn log_level_maps_to_filter_directive() {
        assert_eq!(LogLevel::Warning.as_filter(), "warn");
        assert_eq!(LogLevel::default().as_filter(), "info");
        let config: AriaConfig = toml::from_str("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}

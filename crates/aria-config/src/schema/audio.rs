//! Speech playback configuration types.

use serde::{Deserialize, Serialize};

/// Where decoded speech is played.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum OutputKind {
    /// System audio device, falling back to `clock` when unavailable.
    #[default]
    Device,
    /// Silent output that only advances a playback clock.
    Clock,
}

/// Audio lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub output: OutputKind,
    /// Output volume multiplier, 0.0 to 2.0. Scales the speech sent to the
    /// output and the signal the lip-sync analyser measures.
    pub gain: f64,
    /// Seconds to wait for a user gesture after a rejected play.
    pub autoplay_timeout: f64,
    /// Reject every first play attempt until a gesture arrives.
    pub simulate_autoplay_block: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output: OutputKind::Device,
            gain: 1.0,
            autoplay_timeout: 5.0,
            simulate_autoplay_block: false,
        }
    }
}

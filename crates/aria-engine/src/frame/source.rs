//! What the frame loop needs from audio playback.

/// Live speech loudness as seen by the frame loop.
pub trait VolumeSource {
    /// Whether a session is currently audible.
    fn is_playing(&self) -> bool;

    /// Current loudness in `[0, 1]`. Only sampled while playing.
    fn live_volume(&mut self) -> f32;
}

/// A source that never plays.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl VolumeSource for Silence {
    fn is_playing(&self) -> bool {
        false
    }

    fn live_volume(&mut self) -> f32 {
        0.0
    }
}

/// Fixed loudness, for hosts without an audio device and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantVolume {
    pub playing: bool,
    pub volume: f32,
}

impl ConstantVolume {
    pub fn playing(volume: f32) -> Self {
        Self {
            playing: true,
            volume,
        }
    }
}

impl VolumeSource for ConstantVolume {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn live_volume(&mut self) -> f32 {
        self.volume
    }
}

//! Timeline clip playback for clip-driven characters.

mod mixer;
mod select;

pub use mixer::{ClipAction, Mixer};
pub use select::{pick_random_clip, select_clip, ClipGroup, ClipTables};

use aria_common::Emotion;
use aria_config::schema::ClipsConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::model::AvatarModel;
use crate::warn_once::WarnOnce;

/// Chooses clips and starts them on a mixer.
pub struct ClipPlayer {
    tables: ClipTables,
    crossfade: f32,
    rng: StdRng,
}

impl ClipPlayer {
    pub fn from_config(config: &ClipsConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: &ClipsConfig, rng: StdRng) -> Self {
        Self {
            tables: ClipTables::from_config(config),
            crossfade: config.crossfade as f32,
            rng,
        }
    }

    pub fn apply_config(&mut self, config: &ClipsConfig) {
        self.tables = ClipTables::from_config(config);
        self.crossfade = config.crossfade as f32;
    }

    pub fn tables(&self) -> &ClipTables {
        &self.tables
    }

    pub fn crossfade(&self) -> f32 {
        self.crossfade
    }

    /// Select and start a clip for a response. Returns the clip started.
    pub fn on_response(
        &mut self,
        text: &str,
        emotion: Emotion,
        mixer: &mut Mixer,
        model: &AvatarModel,
        warn: &mut WarnOnce,
    ) -> Option<String> {
        let name = select_clip(&self.tables, text, emotion, mixer.current_clip(), &mut self.rng)?;
        self.start(name, mixer, model, warn)
    }

    /// Play a uniformly random clip other than the current one.
    pub fn trigger_random(
        &mut self,
        mixer: &mut Mixer,
        model: &AvatarModel,
        warn: &mut WarnOnce,
    ) -> Option<String> {
        let names = model.clip_names();
        let name = pick_random_clip(&names, mixer.current_clip(), &mut self.rng)?;
        self.start(name, mixer, model, warn)
    }

    fn start(
        &mut self,
        name: String,
        mixer: &mut Mixer,
        model: &AvatarModel,
        warn: &mut WarnOnce,
    ) -> Option<String> {
        match mixer.play(&name, self.crossfade, model) {
            Ok(()) => {
                tracing::info!(clip = %name, model = model.name(), "playing clip");
                Some(name)
            }
            Err(e) => {
                warn.warn(&format!("clip:{name}"), format_args!("clip skipped: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RigDescriptor;

    fn model() -> AvatarModel {
        let json = r#"{
            "name": "clipper",
            "bones": [{"name": "hips"}],
            "clips": [
                {"name": "Idle", "duration": 2.0, "tracks": []},
                {"name": "Wave", "duration": 1.0, "tracks": []},
                {"name": "Jump", "duration": 1.0, "tracks": []}
            ]
        }"#;
        AvatarModel::from_descriptor(&RigDescriptor::from_json_str(json).unwrap()).unwrap()
    }

    fn player() -> ClipPlayer {
        ClipPlayer::with_rng(&ClipsConfig::default(), StdRng::seed_from_u64(3))
    }

    #[test]
    fn response_keyword_starts_clip() {
        let m = model();
        let mut mixer = Mixer::new();
        let mut warn = WarnOnce::new();
        let started = player().on_response("hello!", Emotion::Neutral, &mut mixer, &m, &mut warn);
        assert_eq!(started.as_deref(), Some("Wave"));
        assert_eq!(mixer.current_clip(), Some("Wave"));
    }

    #[test]
    fn unresolved_clip_is_logged_and_skipped() {
        let m = model();
        let mut mixer = Mixer::new();
        let mut warn = WarnOnce::new();
        let mut p = player();
        // sad maps to Sigh, which this rig lacks
        assert_eq!(p.on_response("fine", Emotion::Sad, &mut mixer, &m, &mut warn), None);
        assert!(!mixer.is_playing());
        assert_eq!(warn.len(), 1);
    }

    #[test]
    fn manual_trigger_never_repeats_current() {
        let m = model();
        let mut mixer = Mixer::new();
        let mut warn = WarnOnce::new();
        let mut p = player();
        let mut last = p.trigger_random(&mut mixer, &m, &mut warn);
        for _ in 0..20 {
            let next = p.trigger_random(&mut mixer, &m, &mut warn);
            assert_ne!(next, last);
            last = next;
        }
    }
}

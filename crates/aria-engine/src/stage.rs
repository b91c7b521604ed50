//! The stage owns the single active avatar.

use aria_common::{CharacterId, RigError};
use aria_config::schema::{CharacterConfig, DriverKind};

use crate::clips::Mixer;
use crate::model::{AvatarModel, RigDescriptor};

pub struct ActiveCharacter {
    pub id: CharacterId,
    pub driver: DriverKind,
    pub model: AvatarModel,
    pub mixer: Mixer,
}

/// Holds at most one loaded model. Every replacement bumps `generation`
/// so per-model bindings elsewhere know to re-attach.
#[derive(Default)]
pub struct Stage {
    active: Option<ActiveCharacter>,
    generation: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a roster entry's rig and make it the active character.
    /// On failure the current character stays.
    pub fn load(&mut self, character: &CharacterConfig) -> Result<(), RigError> {
        let descriptor = RigDescriptor::load(&character.rig)?;
        let model = AvatarModel::from_descriptor(&descriptor)?;
        self.replace(CharacterId::from(character.id.as_str()), character.driver, model);
        Ok(())
    }

    /// Swap in an already-built model, tearing the old one down first.
    pub fn replace(&mut self, id: CharacterId, driver: DriverKind, model: AvatarModel) {
        self.detach();
        tracing::info!(character = %id, model = model.name(), ?driver, "character attached");
        self.active = Some(ActiveCharacter {
            id,
            driver,
            model,
            mixer: Mixer::new(),
        });
        self.generation += 1;
    }

    /// Stop the mixer and drop the model.
    pub fn detach(&mut self) {
        if let Some(mut old) = self.active.take() {
            old.mixer.stop();
            tracing::info!(character = %old.id, "character detached");
            self.generation += 1;
        }
    }

    pub fn active(&self) -> Option<&ActiveCharacter> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveCharacter> {
        self.active.as_mut()
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RIG: &str = r#"{"name": "cube", "bones": [{"name": "hips"}],
        "clips": [{"name": "Spin", "duration": 1.0}]}"#;

    fn model(name: &str) -> AvatarModel {
        let json = RIG.replace("cube", name);
        AvatarModel::from_descriptor(&RigDescriptor::from_json_str(&json).unwrap()).unwrap()
    }

    #[test]
    fn replace_keeps_exactly_one_model() {
        let mut stage = Stage::new();
        assert!(!stage.is_loaded());
        stage.replace(CharacterId::from("a"), DriverKind::Clips, model("a"));
        let g1 = stage.generation();
        {
            let active = stage.active_mut().unwrap();
            let m = &active.model;
            active.mixer.play("Spin", 0.0, m).unwrap();
        }
        stage.replace(CharacterId::from("b"), DriverKind::Skeleton, model("b"));
        let active = stage.active().unwrap();
        assert_eq!(active.id.as_str(), "b");
        assert_eq!(active.model.name(), "b");
        assert!(!active.mixer.is_playing());
        assert!(stage.generation() > g1);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(RIG.as_bytes()).unwrap();
        let character = CharacterConfig {
            id: "cube".into(),
            rig: file.path().to_path_buf(),
            driver: DriverKind::Clips,
        };
        let mut stage = Stage::new();
        stage.load(&character).unwrap();
        assert_eq!(stage.active().unwrap().model.clip_names(), vec!["Spin"]);
    }

    #[test]
    fn failed_load_keeps_current_character() {
        let mut stage = Stage::new();
        stage.replace(CharacterId::from("a"), DriverKind::Skeleton, model("a"));
        let character = CharacterConfig {
            id: "ghost".into(),
            rig: "/nonexistent/ghost.json".into(),
            driver: DriverKind::Skeleton,
        };
        assert!(stage.load(&character).is_err());
        assert_eq!(stage.active().unwrap().id.as_str(), "a");
    }

    #[test]
    fn detach_empties_stage() {
        let mut stage = Stage::new();
        stage.replace(CharacterId::from("a"), DriverKind::Skeleton, model("a"));
        stage.detach();
        assert!(!stage.is_loaded());
        stage.detach();
    }
}

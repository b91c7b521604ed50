//! Character roster configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a character's body is animated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DriverKind {
    /// Pose corrector plus procedural idle motion.
    #[default]
    Skeleton,
    /// Timeline clips selected from the response.
    Clips,
}

/// One selectable character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterConfig {
    pub id: String,
    /// Rig descriptor path (JSON or TOML); relative paths resolve from the
    /// working directory.
    pub rig: PathBuf,
    #[serde(default)]
    pub driver: DriverKind,
}

/// Character roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharactersConfig {
    pub default: String,
    pub roster: Vec<CharacterConfig>,
}

impl CharactersConfig {
    pub fn find(&self, id: &str) -> Option<&CharacterConfig> {
        self.roster.iter().find(|c| c.id == id)
    }
}

impl Default for CharactersConfig {
    fn default() -> Self {
        Self {
            default: "test".into(),
            roster: vec![
                CharacterConfig {
                    id: "test".into(),
                    rig: PathBuf::from("assets/rigs/test.json"),
                    driver: DriverKind::Skeleton,
                },
                CharacterConfig {
                    id: "jinyoung".into(),
                    rig: PathBuf::from("assets/rigs/jinyoung.toml"),
                    driver: DriverKind::Clips,
                },
            ],
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The avatar's emotional state. Exactly one is active at a time.
///
/// Deserialization is lenient: any unrecognised label becomes `Neutral`
/// so a misbehaving upstream service can never stall the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
    ];

    /// Parse a label, falling back to `Neutral` for anything unknown.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "happy" => Emotion::Happy,
            "sad" => Emotion::Sad,
            "angry" => Emotion::Angry,
            "surprised" => Emotion::Surprised,
            _ => Emotion::Neutral,
        }
    }

    /// Parse an optional wire value; missing means `Neutral`.
    pub fn from_wire(label: Option<&str>) -> Self {
        label.map(Self::parse_lenient).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
        }
    }
}

impl From<String> for Emotion {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

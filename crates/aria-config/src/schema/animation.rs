//! Expression blending configuration types.

use aria_common::Emotion;
use serde::{Deserialize, Serialize};

/// Which model expression each emotion drives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmotionExpressionTable {
    pub neutral: String,
    pub happy: String,
    pub sad: String,
    pub angry: String,
    pub surprised: String,
}

impl EmotionExpressionTable {
    pub fn expression_for(&self, emotion: Emotion) -> &str {
        match emotion {
            Emotion::Neutral => &self.neutral,
            Emotion::Happy => &self.happy,
            Emotion::Sad => &self.sad,
            Emotion::Angry => &self.angry,
            Emotion::Surprised => &self.surprised,
        }
    }

    /// All expression names the table controls, in `Emotion::ALL` order.
    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        Emotion::ALL.into_iter().map(|e| self.expression_for(e))
    }
}

impl Default for EmotionExpressionTable {
    fn default() -> Self {
        Self {
            neutral: "neutral".into(),
            happy: "happy".into(),
            sad: "sad".into(),
            angry: "angry".into(),
            // VRM presets name this one with a capital letter.
            surprised: "Surprised".into(),
        }
    }
}

/// Expression blender configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fraction-per-second used to ease expression weights toward targets.
    pub blend_rate: f64,
    pub emotions: EmotionExpressionTable,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend_rate: 3.0,
            emotions: EmotionExpressionTable::default(),
        }
    }
}

//! Emotion → expression targets.

use aria_common::Emotion;
use aria_config::schema::{AnimationConfig, EmotionExpressionTable};

use crate::model::AvatarModel;
use crate::warn_once::WarnOnce;
use crate::weights::TargetFrame;

pub struct ExpressionBlender {
    table: EmotionExpressionTable,
    rate: f32,
}

impl ExpressionBlender {
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            table: config.emotions.clone(),
            rate: config.blend_rate as f32,
        }
    }

    /// Base blend rate per second; other controllers scale from it.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn expression_for(&self, emotion: Emotion) -> &str {
        self.table.expression_for(emotion)
    }

    /// Propose 1.0 for the emotion's expression and 0.0 for every other
    /// expression on the model. If the model lacks the mapped expression
    /// nothing is proposed, so current weights hold.
    pub fn contribute(
        &self,
        emotion: Emotion,
        model: &AvatarModel,
        frame: &mut TargetFrame,
        warn: &mut WarnOnce,
    ) {
        let mapped = self.table.expression_for(emotion);
        if !model.has_expression(mapped) {
            warn.warn(
                &format!("expression:{mapped}"),
                format_args!(
                    "model '{}' has no '{mapped}' expression for emotion {emotion}",
                    model.name()
                ),
            );
            return;
        }

        for name in model.expressions().names() {
            let target = if name == mapped { 1.0 } else { 0.0 };
            frame.propose(name, target, self.rate);
        }
    }
}

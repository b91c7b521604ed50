//! Mouth targets from live speech loudness.

use aria_config::schema::LipSyncConfig;
use glam::Quat;

use crate::model::{AvatarModel, BoneRole};
use crate::warn_once::WarnOnce;
use crate::weights::{ExpressionWeightMap, TargetFrame};

/// Whether an expression name is a mouth shape for `keyword`: equal
/// ignoring case, or ending in `_keyword` / `.keyword`.
pub fn matches_mouth_keyword(name: &str, keyword: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let keyword = keyword.to_ascii_lowercase();
    name == keyword
        || name.ends_with(&format!("_{keyword}"))
        || name.ends_with(&format!(".{keyword}"))
}

#[derive(Debug, Clone, PartialEq)]
struct MouthBinding {
    expression: String,
    gain: f32,
}

pub struct LipSync {
    enabled: bool,
    shapes: Vec<(String, f32)>,
    threshold: f32,
    curve: f32,
    rate: f32,
    jaw_enabled: bool,
    max_jaw_angle: f32,
    bindings: Vec<MouthBinding>,
    use_jaw: bool,
    jaw_angle: f32,
}

impl LipSync {
    /// `base_rate` is the expression blend rate; mouth shapes blend faster.
    pub fn from_config(config: &LipSyncConfig, base_rate: f32) -> Self {
        let mut lipsync = Self {
            enabled: true,
            shapes: Vec::new(),
            threshold: 0.0,
            curve: 1.0,
            rate: 0.0,
            jaw_enabled: false,
            max_jaw_angle: 0.0,
            bindings: Vec::new(),
            use_jaw: false,
            jaw_angle: 0.0,
        };
        lipsync.apply_config(config, base_rate);
        lipsync
    }

    /// Retune; takes effect for the next attached model's bindings too.
    pub fn apply_config(&mut self, config: &LipSyncConfig, base_rate: f32) {
        self.enabled = config.enabled;
        self.shapes = config
            .mouth_shapes
            .iter()
            .map(|s| (s.keyword.clone(), s.gain as f32))
            .collect();
        self.threshold = config.threshold as f32;
        self.curve = config.curve as f32;
        self.rate = base_rate * config.blend_rate_multiplier as f32;
        self.jaw_enabled = config.jaw.enabled;
        self.max_jaw_angle = config.jaw.max_angle as f32;
    }

    /// Bind mouth shapes to the model's expressions, or fall back to the jaw.
    pub fn attach(&mut self, model: &AvatarModel) {
        self.bindings = model
            .expressions()
            .names()
            .filter_map(|name| {
                self.shapes
                    .iter()
                    .find(|(kw, _)| matches_mouth_keyword(name, kw))
                    .map(|(_, gain)| MouthBinding {
                        expression: name.to_string(),
                        gain: *gain,
                    })
            })
            .collect();
        self.use_jaw =
            self.bindings.is_empty() && self.jaw_enabled && model.has_role(BoneRole::Jaw);
        self.jaw_angle = 0.0;

        tracing::debug!(
            model = model.name(),
            mouth_shapes = self.bindings.len(),
            jaw_fallback = self.use_jaw,
            "lip-sync attached"
        );
    }

    pub fn mouth_expressions(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.expression.as_str())
    }

    pub fn uses_jaw(&self) -> bool {
        self.use_jaw
    }

    pub fn jaw_angle(&self) -> f32 {
        self.jaw_angle
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Mouth opening level in `[0, 1]` for a loudness sample. `None`
    /// (not playing) and anything under the threshold close the mouth.
    pub fn level(&self, loudness: Option<f32>) -> f32 {
        match loudness {
            Some(l) if self.enabled && l.is_finite() => {
                let l = l.clamp(0.0, 1.0);
                if l < self.threshold {
                    0.0
                } else {
                    l.powf(self.curve)
                }
            }
            _ => 0.0,
        }
    }

    /// Propose `level * gain` for every bound mouth expression.
    pub fn contribute(&self, level: f32, frame: &mut TargetFrame) {
        for binding in &self.bindings {
            frame.propose(&binding.expression, level * binding.gain, self.rate);
        }
    }

    /// Ease the jaw toward `level * max_angle` when using the bone fallback.
    pub fn drive_jaw(&mut self, level: f32, dt: f32, model: &mut AvatarModel, warn: &mut WarnOnce) {
        if !self.use_jaw {
            return;
        }
        let target = level * self.max_jaw_angle;
        self.jaw_angle += (target - self.jaw_angle) * (self.rate * dt.max(0.0)).min(1.0);

        match model.role_bone_mut(BoneRole::Jaw) {
            Ok(jaw) => jaw.local.rotation = jaw.rest.rotation * Quat::from_rotation_x(self.jaw_angle),
            Err(e) => {
                warn.warn("bone:jaw", e);
            }
        }
    }

    /// Close the mouth immediately, e.g. when speech ends.
    pub fn reset(&mut self, weights: &mut ExpressionWeightMap, model: Option<&mut AvatarModel>) {
        for binding in &self.bindings {
            weights.set(&binding.expression, 0.0);
        }
        self.jaw_angle = 0.0;
        if let Some(model) = model {
            if self.use_jaw {
                if let Ok(jaw) = model.role_bone_mut(BoneRole::Jaw) {
                    jaw.local.rotation = jaw.rest.rotation;
                }
            }
        }
    }
}

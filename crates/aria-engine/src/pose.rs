//! Arm pose correction: brings T-posed rigs into a relaxed A-pose.

use std::collections::HashMap;

use aria_config::schema::{PoseConfig, PoseMode};
use glam::Quat;

use crate::model::{AvatarModel, BoneRole};
use crate::warn_once::WarnOnce;

const ARM_CHAIN: [BoneRole; 6] = [
    BoneRole::LeftUpperArm,
    BoneRole::RightUpperArm,
    BoneRole::LeftLowerArm,
    BoneRole::RightLowerArm,
    BoneRole::LeftHand,
    BoneRole::RightHand,
];

pub struct PoseCorrector {
    enabled: bool,
    mode: PoseMode,
    rate: f32,
    angle: f32,
    /// Last corrected rotation per role. Smoothing runs from here rather
    /// than from the bone, so later layers (idle sway) never feed back.
    current: HashMap<BoneRole, Quat>,
}

impl PoseCorrector {
    pub fn from_config(config: &PoseConfig) -> Self {
        Self {
            enabled: config.enabled,
            mode: config.mode,
            rate: config.smooth_rate as f32,
            angle: config.upper_arm_angle as f32,
            current: HashMap::new(),
        }
    }

    pub fn apply_config(&mut self, config: &PoseConfig) {
        self.enabled = config.enabled;
        self.mode = config.mode;
        self.rate = config.smooth_rate as f32;
        self.angle = config.upper_arm_angle as f32;
    }

    pub fn mode(&self) -> PoseMode {
        self.mode
    }

    /// Target local rotation for `role` given its rest rotation.
    pub fn target(&self, role: BoneRole, rest: Quat) -> Quat {
        match role {
            BoneRole::LeftUpperArm => rest * Quat::from_rotation_z(self.angle),
            BoneRole::RightUpperArm => rest * Quat::from_rotation_z(-self.angle),
            _ => rest,
        }
    }

    pub fn apply(&mut self, dt: f32, model: &mut AvatarModel, warn: &mut WarnOnce) {
        if !self.enabled {
            return;
        }
        let t = (self.rate * dt).clamp(0.0, 1.0);

        for role in ARM_CHAIN {
            let bone = match model.role_bone_mut(role) {
                Ok(bone) => bone,
                Err(e) => {
                    warn.warn(&format!("pose:{role}"), format_args!("pose correction skipped: {e}"));
                    continue;
                }
            };
            let target = self.target(role, bone.rest.rotation);
            let rotation = match self.mode {
                PoseMode::Snap => target,
                PoseMode::Smooth => {
                    let from = *self.current.entry(role).or_insert(bone.rest.rotation);
                    from.slerp(target, t)
                }
            };
            self.current.insert(role, rotation);
            bone.local.rotation = rotation;
        }
    }

    /// Forget per-model state after a character switch.
    pub fn reset(&mut self) {
        self.current.clear();
    }
}

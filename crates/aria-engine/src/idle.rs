//! Procedural idle motion: breathing, sway and small head drift.
//!
//! Offsets are pure functions of elapsed time. Torso bones compose onto
//! their rest rotation; upper arms compose onto whatever the pose
//! corrector wrote this frame.

use aria_config::schema::IdleConfig;
use glam::{Quat, Vec3};
use std::f32::consts::PI;

use crate::model::{AvatarModel, Bone, BoneRole};
use crate::warn_once::WarnOnce;

/// Idle offsets at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleOffsets {
    pub hip_bob: f32,
    pub chest_scale: f32,
    pub chest_pitch: f32,
    pub upper_chest_roll: f32,
    pub head_yaw: f32,
    pub head_pitch: f32,
    pub left_arm_sway: f32,
    pub right_arm_sway: f32,
}

impl IdleOffsets {
    pub fn at(t: f64, amplitude: f32) -> Self {
        let wave = |freq: f64, phase: f64| (freq * t + phase).sin() as f32;
        Self {
            hip_bob: wave(1.2, 0.0) * 0.005 * amplitude,
            chest_scale: 1.0 + wave(1.5, 0.0) * 0.01 * amplitude,
            chest_pitch: wave(1.5, 0.0) * 0.01 * amplitude,
            upper_chest_roll: wave(0.7, 1.3) * 0.012 * amplitude,
            head_yaw: wave(0.5, 2.1) * 0.015 * amplitude,
            head_pitch: wave(0.9, 0.4) * 0.01 * amplitude,
            left_arm_sway: wave(1.5, 0.0) * 0.05 * amplitude,
            right_arm_sway: wave(1.5, PI as f64) * 0.05 * amplitude,
        }
    }
}

pub struct IdleMotion {
    enabled: bool,
    amplitude: f32,
}

impl IdleMotion {
    pub fn from_config(config: &IdleConfig) -> Self {
        Self {
            enabled: config.enabled,
            amplitude: config.amplitude as f32,
        }
    }

    pub fn apply_config(&mut self, config: &IdleConfig) {
        *self = Self::from_config(config);
    }

    pub fn apply(&self, t: f64, model: &mut AvatarModel, warn: &mut WarnOnce) {
        if !self.enabled || self.amplitude == 0.0 {
            return;
        }
        let o = IdleOffsets::at(t, self.amplitude);

        if let Some(bone) = driven(model, BoneRole::Hips, warn) {
            bone.local.translation = bone.rest.translation + Vec3::Y * o.hip_bob;
        }
        if let Some(bone) = driven(model, BoneRole::Chest, warn) {
            bone.local.rotation = bone.rest.rotation * Quat::from_rotation_x(o.chest_pitch);
            bone.local.scale = bone.rest.scale * o.chest_scale;
        }
        if let Some(bone) = driven(model, BoneRole::UpperChest, warn) {
            bone.local.rotation = bone.rest.rotation * Quat::from_rotation_z(o.upper_chest_roll);
        }
        if let Some(bone) = driven(model, BoneRole::Head, warn) {
            bone.local.rotation = bone.rest.rotation
                * Quat::from_rotation_y(o.head_yaw)
                * Quat::from_rotation_x(o.head_pitch);
        }
        if let Some(bone) = driven(model, BoneRole::LeftUpperArm, warn) {
            bone.local.rotation = bone.local.rotation * Quat::from_rotation_z(o.left_arm_sway);
        }
        if let Some(bone) = driven(model, BoneRole::RightUpperArm, warn) {
            bone.local.rotation = bone.local.rotation * Quat::from_rotation_z(o.right_arm_sway);
        }
    }
}

fn driven<'a>(model: &'a mut AvatarModel, role: BoneRole, warn: &mut WarnOnce) -> Option<&'a mut Bone> {
    match model.role_bone_mut(role) {
        Ok(bone) => Some(bone),
        Err(e) => {
            warn.warn(&format!("idle:{role}"), format_args!("idle motion skipped: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RigDescriptor;

    fn model() -> AvatarModel {
        let json = r#"{
            "name": "idle",
            "bones": [
                {"name": "hips", "translation": [0, 1, 0]},
                {"name": "chest", "parent": "hips"},
                {"name": "head", "parent": "chest"},
                {"name": "leftUpperArm", "parent": "chest"},
                {"name": "rightUpperArm", "parent": "chest"}
            ]
        }"#;
        AvatarModel::from_descriptor(&RigDescriptor::from_json_str(json).unwrap()).unwrap()
    }

    #[test]
    fn offsets_at_zero() {
        let o = IdleOffsets::at(0.0, 1.0);
        assert_eq!(o.hip_bob, 0.0);
        assert_eq!(o.chest_scale, 1.0);
        assert!((o.upper_chest_roll - 1.3f32.sin() * 0.012).abs() < 1e-6);
        assert!((o.head_yaw - 2.1f32.sin() * 0.015).abs() < 1e-6);
    }

    #[test]
    fn arm_sway_is_in_opposite_phase() {
        for i in 0..50 {
            let o = IdleOffsets::at(i as f64 * 0.37, 1.0);
            assert!((o.left_arm_sway + o.right_arm_sway).abs() < 1e-5);
        }
    }

    #[test]
    fn amplitude_scales_and_zero_disables() {
        let full = IdleOffsets::at(1.0, 1.0);
        let half = IdleOffsets::at(1.0, 0.5);
        assert!((half.chest_pitch - full.chest_pitch * 0.5).abs() < 1e-7);
        let none = IdleOffsets::at(1.0, 0.0);
        assert_eq!(none.chest_scale, 1.0);
        assert_eq!(none.left_arm_sway, 0.0);
    }

    #[test]
    fn torso_composes_onto_rest_without_drift() {
        let idle = IdleMotion::from_config(&IdleConfig::default());
        let mut m = model();
        let mut warn = WarnOnce::new();
        idle.apply(1.0, &mut m, &mut warn);
        let first = m.role_bone(BoneRole::Chest).unwrap().local;
        for _ in 0..10 {
            idle.apply(1.0, &mut m, &mut warn);
        }
        assert_eq!(m.role_bone(BoneRole::Chest).unwrap().local, first);
        let hips = m.role_bone(BoneRole::Hips).unwrap();
        assert!((hips.local.translation.y - 1.0 - 1.2f32.sin() * 0.005).abs() < 1e-6);
    }

    #[test]
    fn missing_bones_warn_once() {
        let idle = IdleMotion::from_config(&IdleConfig::default());
        let mut m = model();
        let mut warn = WarnOnce::new();
        idle.apply(0.5, &mut m, &mut warn);
        idle.apply(0.6, &mut m, &mut warn);
        // upperChest is the only driven role this rig lacks
        assert_eq!(warn.len(), 1);
    }
}

//! A loaded avatar: skeleton, expressions, clips and look-at.

use aria_common::RigError;
use glam::{Quat, Vec3};
use std::collections::HashMap;

use super::clip::Clip;
use super::descriptor::RigDescriptor;
use super::expressions::ExpressionSet;
use super::rig_map::{BoneRole, RigMap};
use super::skeleton::{Bone, BoneHandle, Skeleton, Transform};

/// Eye direction as yaw/pitch in model space. Zero looks down the
/// model's forward axis (-Z).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookAt {
    head_offset: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAt {
    /// Rotation that turns the forward axis toward `(yaw, pitch)`.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }
}

#[derive(Debug, Clone)]
pub struct AvatarModel {
    name: String,
    skeleton: Skeleton,
    rig: RigMap,
    expressions: ExpressionSet,
    clips: HashMap<String, Clip>,
    scene_root: Transform,
    look_at: Option<LookAt>,
}

impl AvatarModel {
    pub fn from_descriptor(desc: &RigDescriptor) -> Result<Self, RigError> {
        desc.validate()?;

        let skeleton = Skeleton::from_descriptors(&desc.bones);
        let rig = RigMap::resolve(&skeleton, &desc.humanoid);
        let clips = desc
            .clips
            .iter()
            .map(|c| (c.name.clone(), Clip::from_descriptor(c)))
            .collect();
        let scene_root = Transform {
            translation: Vec3::from_array(desc.scene.position),
            rotation: Quat::from_rotation_y(desc.scene.yaw),
            scale: Vec3::ONE,
        };
        let look_at = desc.look_at.as_ref().map(|l| LookAt {
            head_offset: Vec3::from_array(l.head_offset),
            ..LookAt::default()
        });

        let model = Self {
            name: desc.name.clone(),
            skeleton,
            rig,
            expressions: ExpressionSet::new(&desc.expressions),
            clips,
            scene_root,
            look_at,
        };

        tracing::info!(
            model = %model.name,
            bones = model.skeleton.len(),
            expressions = model.expressions.len(),
            clips = model.clips.len(),
            look_at = model.look_at.is_some(),
            "avatar model loaded"
        );
        let missing = model.rig.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|r| r.humanoid_name()).collect();
            tracing::debug!(model = %model.name, missing = ?names, "unmapped bone roles");
        }
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn rig(&self) -> &RigMap {
        &self.rig
    }

    pub fn has_role(&self, role: BoneRole) -> bool {
        self.rig.get(role).is_some()
    }

    pub fn role_bone(&self, role: BoneRole) -> Option<&Bone> {
        self.rig.get(role).map(|h| self.skeleton.bone(h))
    }

    pub fn role_bone_mut(&mut self, role: BoneRole) -> Result<&mut Bone, RigError> {
        let handle: BoneHandle = self
            .rig
            .get(role)
            .ok_or_else(|| RigError::MissingBone(role.humanoid_name().to_string()))?;
        Ok(self.skeleton.bone_mut(handle))
    }

    pub fn expressions(&self) -> &ExpressionSet {
        &self.expressions
    }

    pub fn has_expression(&self, name: &str) -> bool {
        self.expressions.contains(name)
    }

    pub fn set_expression(&mut self, name: &str, weight: f32) -> Result<(), RigError> {
        self.expressions.set(name, weight)
    }

    /// Weight visible to the renderer (as of the last commit).
    pub fn expression_weight(&self, name: &str) -> Option<f32> {
        self.expressions.applied(name)
    }

    pub fn clip(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    pub fn clip_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn scene_root(&self) -> &Transform {
        &self.scene_root
    }

    /// Look-at needs either a declared capability or eye bones to drive.
    pub fn supports_look_at(&self) -> bool {
        self.look_at.is_some() || self.has_role(BoneRole::LeftEye) || self.has_role(BoneRole::RightEye)
    }

    pub fn look_at(&self) -> Option<&LookAt> {
        self.look_at.as_ref()
    }

    pub fn set_look_at(&mut self, yaw: f32, pitch: f32) {
        if !self.supports_look_at() {
            return;
        }
        let look_at = self.look_at.get_or_insert_with(LookAt::default);
        look_at.yaw = yaw;
        look_at.pitch = pitch;
    }

    /// World-space point the eyes look from.
    pub fn head_anchor(&self) -> Vec3 {
        let offset = self.look_at.map(|l| l.head_offset).unwrap_or(Vec3::ZERO);
        let root = self.scene_root.to_matrix();
        match self.rig.get(BoneRole::Head) {
            Some(head) => (root * self.skeleton.model_matrix(head)).transform_point3(offset),
            None => root.transform_point3(offset),
        }
    }

    /// Convert a world-space direction into model space.
    pub fn to_model_direction(&self, world: Vec3) -> Vec3 {
        self.scene_root.rotation.inverse() * world
    }

    /// Apply staged expression weights and drive the eyes from look-at.
    pub fn commit(&mut self) {
        self.expressions.commit();

        if let Some(look_at) = self.look_at {
            let rotation = look_at.rotation();
            for role in [BoneRole::LeftEye, BoneRole::RightEye] {
                if let Some(handle) = self.rig.get(role) {
                    let eye = self.skeleton.bone_mut(handle);
                    eye.local.rotation = eye.rest.rotation * rotation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIG: &str = r#"{
        "name": "unit",
        "bones": [
            {"name": "hips", "translation": [0, 1, 0]},
            {"name": "head", "parent": "hips", "translation": [0, 0.5, 0]},
            {"name": "leftEye", "parent": "head", "translation": [0.03, 0.05, -0.05]}
        ],
        "expressions": ["happy", "blink"],
        "look_at": {"head_offset": [0, 0.05, 0]},
        "scene": {"position": [0, -1.2, 0], "yaw": 0}
    }"#;

    fn model() -> AvatarModel {
        AvatarModel::from_descriptor(&RigDescriptor::from_json_str(RIG).unwrap()).unwrap()
    }

    #[test]
    fn expressions_apply_only_on_commit() {
        let mut model = model();
        model.set_expression("happy", 0.6).unwrap();
        assert_eq!(model.expression_weight("happy"), Some(0.0));
        model.commit();
        assert!((model.expression_weight("happy").unwrap() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn head_anchor_includes_scene_root() {
        let model = model();
        let anchor = model.head_anchor();
        assert!((anchor - Vec3::new(0.0, 0.35, 0.0)).length() < 1e-5);
    }

    #[test]
    fn commit_rotates_eyes_from_look_at() {
        let mut model = model();
        model.set_look_at(0.3, 0.0);
        model.commit();
        let eye = model.role_bone(BoneRole::LeftEye).unwrap();
        assert!((eye.local.rotation.angle_between(eye.rest.rotation) - 0.3).abs() < 1e-4);
        assert!(model.role_bone(BoneRole::RightEye).is_none());
    }

    #[test]
    fn look_at_ignored_without_capability() {
        let desc = RigDescriptor::from_json_str(r#"{"name": "flat", "bones": [{"name": "hips"}]}"#)
            .unwrap();
        let mut model = AvatarModel::from_descriptor(&desc).unwrap();
        assert!(!model.supports_look_at());
        model.set_look_at(0.4, 0.1);
        assert!(model.look_at().is_none());
    }

    #[test]
    fn missing_role_is_an_error() {
        let mut model = model();
        let err = model.role_bone_mut(BoneRole::Jaw).unwrap_err();
        assert_eq!(err, RigError::MissingBone("jaw".into()));
    }

    #[test]
    fn default_scene_yaw_faces_camera() {
        let desc = RigDescriptor::from_json_str(r#"{"name": "r", "bones": []}"#).unwrap();
        let model = AvatarModel::from_descriptor(&desc).unwrap();
        let forward = model.scene_root().rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::Z).length() < 1e-5);
        assert!((model.scene_root().translation.y + 1.2).abs() < 1e-6);
    }
}

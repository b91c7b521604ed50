//! Bone hierarchy with rest and current local transforms.

use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;

use super::descriptor::BoneDescriptor;

/// Index of a bone inside its [`Skeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneHandle(usize);

impl BoneHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneHandle>,
    pub rest: Transform,
    pub local: Transform,
}

#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneHandle>,
}

impl Skeleton {
    /// Build from descriptors already checked by `RigDescriptor::validate`
    /// (parents precede children).
    pub(crate) fn from_descriptors(descriptors: &[BoneDescriptor]) -> Self {
        let mut skeleton = Skeleton::default();
        for desc in descriptors {
            let parent = desc
                .parent
                .as_deref()
                .and_then(|p| skeleton.by_name.get(p).copied());
            let rest = Transform {
                translation: Vec3::from_array(desc.translation),
                rotation: Quat::from_array(desc.rotation).normalize(),
                scale: Vec3::from_array(desc.scale),
            };
            let handle = BoneHandle(skeleton.bones.len());
            skeleton.bones.push(Bone {
                name: desc.name.clone(),
                parent,
                rest,
                local: rest,
            });
            skeleton.by_name.insert(desc.name.clone(), handle);
        }
        skeleton
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<BoneHandle> {
        self.by_name.get(name).copied()
    }

    /// Case-insensitive lookup, used only while resolving roles at load.
    pub(crate) fn find_ignore_case(&self, name: &str) -> Option<BoneHandle> {
        self.find(name).or_else(|| {
            self.bones
                .iter()
                .position(|b| b.name.eq_ignore_ascii_case(name))
                .map(BoneHandle)
        })
    }

    pub fn bone(&self, handle: BoneHandle) -> &Bone {
        &self.bones[handle.0]
    }

    pub fn bone_mut(&mut self, handle: BoneHandle) -> &mut Bone {
        &mut self.bones[handle.0]
    }

    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter()
    }

    pub fn reset_to_rest(&mut self) {
        for bone in &mut self.bones {
            bone.local = bone.rest;
        }
    }

    /// Model-space matrix of a bone from its current local transforms.
    pub fn model_matrix(&self, handle: BoneHandle) -> Mat4 {
        let mut matrix = self.bones[handle.0].local.to_matrix();
        let mut parent = self.bones[handle.0].parent;
        while let Some(p) = parent {
            matrix = self.bones[p.0].local.to_matrix() * matrix;
            parent = self.bones[p.0].parent;
        }
        matrix
    }
}

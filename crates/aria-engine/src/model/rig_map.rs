//! Humanoid bone roles resolved once per model.

use std::collections::BTreeMap;
use std::fmt;

use super::skeleton::{BoneHandle, Skeleton};

/// Bones the animation core drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoneRole {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    Jaw,
    LeftEye,
    RightEye,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
}

impl BoneRole {
    pub const ALL: [BoneRole; 15] = [
        BoneRole::Hips,
        BoneRole::Spine,
        BoneRole::Chest,
        BoneRole::UpperChest,
        BoneRole::Neck,
        BoneRole::Head,
        BoneRole::Jaw,
        BoneRole::LeftEye,
        BoneRole::RightEye,
        BoneRole::LeftUpperArm,
        BoneRole::RightUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::RightLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightHand,
    ];

    /// Humanoid role name as used by VRM rigs.
    pub fn humanoid_name(self) -> &'static str {
        match self {
            BoneRole::Hips => "hips",
            BoneRole::Spine => "spine",
            BoneRole::Chest => "chest",
            BoneRole::UpperChest => "upperChest",
            BoneRole::Neck => "neck",
            BoneRole::Head => "head",
            BoneRole::Jaw => "jaw",
            BoneRole::LeftEye => "leftEye",
            BoneRole::RightEye => "rightEye",
            BoneRole::LeftUpperArm => "leftUpperArm",
            BoneRole::RightUpperArm => "rightUpperArm",
            BoneRole::LeftLowerArm => "leftLowerArm",
            BoneRole::RightLowerArm => "rightLowerArm",
            BoneRole::LeftHand => "leftHand",
            BoneRole::RightHand => "rightHand",
        }
    }
}

impl fmt::Display for BoneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.humanoid_name())
    }
}

/// Role → optional bone handle.
#[derive(Debug, Clone, Default)]
pub struct RigMap {
    handles: [Option<BoneHandle>; BoneRole::ALL.len()],
}

impl RigMap {
    /// Resolve every role: an explicit humanoid mapping wins, otherwise a
    /// bone named after the role (case-insensitive).
    pub fn resolve(skeleton: &Skeleton, humanoid: &BTreeMap<String, String>) -> Self {
        let mut map = RigMap::default();
        for role in BoneRole::ALL {
            let handle = humanoid
                .iter()
                .find(|(r, _)| r.eq_ignore_ascii_case(role.humanoid_name()))
                .and_then(|(_, bone)| skeleton.find(bone))
                .or_else(|| skeleton.find_ignore_case(role.humanoid_name()));
            map.handles[role as usize] = handle;
        }
        map
    }

    pub fn get(&self, role: BoneRole) -> Option<BoneHandle> {
        self.handles[role as usize]
    }

    pub fn missing(&self) -> Vec<BoneRole> {
        BoneRole::ALL
            .into_iter()
            .filter(|r| self.get(*r).is_none())
            .collect()
    }
}

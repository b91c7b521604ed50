//! Serialisable rig descriptor: the on-disk form of an avatar model.

use aria_common::RigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::f32::consts::PI;
use std::path::Path;

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_true() -> bool {
    true
}

/// One bone in rest pose. Rotations are `[x, y, z, w]` quaternions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoneDescriptor {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

/// Keyframes for one bone. `rotations` and `translations` are either
/// empty or the same length as `times`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackDescriptor {
    pub bone: String,
    pub times: Vec<f32>,
    #[serde(default)]
    pub rotations: Vec<[f32; 4]>,
    #[serde(default)]
    pub translations: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipDescriptor {
    pub name: String,
    pub duration: f32,
    #[serde(default = "default_true")]
    pub looping: bool,
    #[serde(default)]
    pub tracks: Vec<TrackDescriptor>,
}

/// Presence of this block gives the model a look-at capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookAtDescriptor {
    /// Offset from the head bone to the point the eyes look from.
    pub head_offset: [f32; 3],
}

impl Default for LookAtDescriptor {
    fn default() -> Self {
        Self {
            head_offset: [0.0, 0.06, 0.0],
        }
    }
}

/// Placement of the model root in the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneDescriptor {
    pub position: [f32; 3],
    /// Rotation about Y in radians.
    pub yaw: f32,
}

impl Default for SceneDescriptor {
    fn default() -> Self {
        Self {
            position: [0.0, -1.2, 0.0],
            yaw: PI,
        }
    }
}

/// A rigged model: named bones, named expressions, optional clips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RigDescriptor {
    pub name: String,
    #[serde(default)]
    pub bones: Vec<BoneDescriptor>,
    /// Humanoid role name (`leftUpperArm`, `head`, ...) to bone name, for
    /// rigs whose bone names differ from the role names.
    #[serde(default)]
    pub humanoid: BTreeMap<String, String>,
    #[serde(default)]
    pub expressions: Vec<String>,
    #[serde(default)]
    pub clips: Vec<ClipDescriptor>,
    #[serde(default)]
    pub look_at: Option<LookAtDescriptor>,
    #[serde(default)]
    pub scene: SceneDescriptor,
}

impl RigDescriptor {
    /// Load a descriptor from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, RigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RigError::InvalidDescriptor(format!("failed to read {}: {e}", path.display()))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let descriptor = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        tracing::debug!(
            path = %path.display(),
            bones = descriptor.bones.len(),
            expressions = descriptor.expressions.len(),
            clips = descriptor.clips.len(),
            "loaded rig descriptor"
        );
        Ok(descriptor)
    }

    pub fn from_json_str(s: &str) -> Result<Self, RigError> {
        let descriptor: Self = serde_json::from_str(s)
            .map_err(|e| RigError::InvalidDescriptor(format!("invalid JSON: {e}")))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RigError> {
        let descriptor: Self = toml::from_str(s)
            .map_err(|e| RigError::InvalidDescriptor(format!("invalid TOML: {e}")))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Structural checks: unique names, parents declared before children,
    /// usable rotations and well-formed clip tracks.
    pub fn validate(&self) -> Result<(), RigError> {
        let mut seen = HashSet::new();
        for bone in &self.bones {
            if let Some(parent) = &bone.parent {
                if !seen.contains(parent.as_str()) {
                    return Err(RigError::InvalidDescriptor(format!(
                        "bone '{}' references parent '{parent}' before it is declared",
                        bone.name
                    )));
                }
            }
            if !seen.insert(bone.name.as_str()) {
                return Err(RigError::InvalidDescriptor(format!(
                    "duplicate bone '{}'",
                    bone.name
                )));
            }
            check_rotation(&bone.rotation, &bone.name)?;
            check_finite(&bone.translation, &bone.name, "translation")?;
            check_finite(&bone.scale, &bone.name, "scale")?;
        }
        check_finite(&self.scene.position, "scene", "position")?;
        check_finite(&[self.scene.yaw], "scene", "yaw")?;
        if let Some(look_at) = &self.look_at {
            check_finite(&look_at.head_offset, "look_at", "head_offset")?;
        }

        let mut expressions = HashSet::new();
        for name in &self.expressions {
            if !expressions.insert(name.as_str()) {
                return Err(RigError::InvalidDescriptor(format!(
                    "duplicate expression '{name}'"
                )));
            }
        }

        for clip in &self.clips {
            if !clip.duration.is_finite() || clip.duration <= 0.0 {
                return Err(RigError::InvalidDescriptor(format!(
                    "clip '{}' has non-positive duration",
                    clip.name
                )));
            }
            for track in &clip.tracks {
                let len = track.times.len();
                let rotations_ok = track.rotations.is_empty() || track.rotations.len() == len;
                let translations_ok =
                    track.translations.is_empty() || track.translations.len() == len;
                if len == 0 || !rotations_ok || !translations_ok {
                    return Err(RigError::InvalidDescriptor(format!(
                        "clip '{}' track '{}' has mismatched keyframe arrays",
                        clip.name, track.bone
                    )));
                }
                let owner = format!("{}/{}", clip.name, track.bone);
                check_finite(&track.times, &owner, "key time")?;
                if track.times.windows(2).any(|w| !(w[1] >= w[0])) {
                    return Err(RigError::InvalidDescriptor(format!(
                        "clip '{}' track '{}' times are not sorted",
                        clip.name, track.bone
                    )));
                }
                for rotation in &track.rotations {
                    check_rotation(rotation, &track.bone)?;
                }
                for translation in &track.translations {
                    check_finite(translation, &owner, "translation")?;
                }
            }
        }

        Ok(())
    }
}

fn check_rotation(q: &[f32; 4], owner: &str) -> Result<(), RigError> {
    let len_sq: f32 = q.iter().map(|c| c * c).sum();
    if !len_sq.is_finite() || len_sq < 1e-8 {
        return Err(RigError::InvalidDescriptor(format!(
            "'{owner}' has a degenerate rotation"
        )));
    }
    Ok(())
}

fn check_finite(values: &[f32], owner: &str, what: &str) -> Result<(), RigError> {
    if values.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(RigError::InvalidDescriptor(format!(
        "'{owner}' has a non-finite {what}"
    )))
}

//! Clip mixer: one current action and at most one fading-out previous.

use std::collections::BTreeMap;

use aria_common::RigError;
use glam::{Quat, Vec3};

use crate::model::{AvatarModel, BoneHandle, Clip};

/// A clip being played with its own time, weight and fade.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: Clip,
    /// Track index → resolved bone. Unknown bones resolve to `None`.
    targets: Vec<Option<BoneHandle>>,
    time: f32,
    weight: f32,
    /// Weight change per second; positive fades in, negative fades out.
    fade: f32,
}

impl ClipAction {
    fn new(clip: &Clip, model: &AvatarModel) -> Self {
        let targets = clip
            .tracks
            .iter()
            .map(|track| {
                let handle = model.skeleton().find(&track.bone);
                if handle.is_none() {
                    tracing::debug!(clip = %clip.name, bone = %track.bone, "clip track targets unknown bone");
                }
                handle
            })
            .collect();
        Self {
            clip: clip.clone(),
            targets,
            time: 0.0,
            weight: 0.0,
            fade: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.clip.name
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    fn fade_to(&mut self, target: f32, duration: f32) {
        if duration <= 0.0 {
            self.weight = target;
            self.fade = 0.0;
        } else {
            self.fade = (target - self.weight) / duration;
        }
    }

    fn advance(&mut self, dt: f32) {
        self.time += dt;
        if self.clip.looping {
            self.time = self.time.rem_euclid(self.clip.duration);
        } else {
            self.time = self.time.min(self.clip.duration);
        }
        if self.fade != 0.0 {
            self.weight = (self.weight + self.fade * dt).clamp(0.0, 1.0);
            if self.weight == 0.0 || self.weight == 1.0 {
                self.fade = 0.0;
            }
        }
    }
}

#[derive(Default)]
struct Accum {
    rotation: Option<(Quat, f32)>,
    translation: Option<(Vec3, f32)>,
}

impl Accum {
    fn add_rotation(&mut self, q: Quat, w: f32) {
        self.rotation = Some(match self.rotation {
            None => (q, w),
            Some((acc, total)) => {
                let total = total + w;
                (acc.slerp(q, w / total), total)
            }
        });
    }

    fn add_translation(&mut self, v: Vec3, w: f32) {
        self.translation = Some(match self.translation {
            None => (v, w),
            Some((acc, total)) => {
                let total = total + w;
                (acc.lerp(v, w / total), total)
            }
        });
    }
}

#[derive(Debug, Default)]
pub struct Mixer {
    current: Option<ClipAction>,
    previous: Option<ClipAction>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fade out whatever is playing and fade in `name` from its start.
    pub fn play(&mut self, name: &str, crossfade: f32, model: &AvatarModel) -> Result<(), RigError> {
        let clip = model
            .clip(name)
            .ok_or_else(|| RigError::MissingClip(name.to_string()))?;

        let mut next = ClipAction::new(clip, model);
        match self.current.take() {
            Some(mut old) if crossfade > 0.0 => {
                old.fade_to(0.0, crossfade);
                self.previous = Some(old);
                next.fade_to(1.0, crossfade);
            }
            _ => {
                self.previous = None;
                next.weight = 1.0;
            }
        }
        tracing::debug!(clip = name, crossfade, "clip action started");
        self.current = Some(next);
        Ok(())
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(action) = self.current.as_mut() {
            action.advance(dt);
        }
        if let Some(action) = self.previous.as_mut() {
            action.advance(dt);
            if action.weight <= 0.0 {
                self.previous = None;
            }
        }
    }

    /// Write the blended pose of all active actions into the skeleton.
    /// Bones with less than full total weight are blended with their rest pose.
    pub fn apply(&self, model: &mut AvatarModel) {
        let mut pose: BTreeMap<usize, (BoneHandle, Accum)> = BTreeMap::new();
        for action in self.actions() {
            if action.weight <= 0.0 {
                continue;
            }
            for (track, target) in action.clip.tracks.iter().zip(&action.targets) {
                let Some(handle) = *target else { continue };
                let sample = track.sample(action.time);
                let (_, acc) = pose
                    .entry(handle.index())
                    .or_insert_with(|| (handle, Accum::default()));
                if let Some(q) = sample.rotation {
                    acc.add_rotation(q, action.weight);
                }
                if let Some(v) = sample.translation {
                    acc.add_translation(v, action.weight);
                }
            }
        }

        let skeleton = model.skeleton_mut();
        for (handle, mut acc) in pose.into_values() {
            let bone = skeleton.bone_mut(handle);
            let rest = bone.rest;
            if let Some((_, total)) = acc.rotation {
                if total < 1.0 {
                    acc.add_rotation(rest.rotation, 1.0 - total);
                }
            }
            if let Some((_, total)) = acc.translation {
                if total < 1.0 {
                    acc.add_translation(rest.translation, 1.0 - total);
                }
            }
            if let Some((q, _)) = acc.rotation {
                bone.local.rotation = q.normalize();
            }
            if let Some((v, _)) = acc.translation {
                bone.local.translation = v;
            }
        }
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.previous = None;
    }

    pub fn current(&self) -> Option<&ClipAction> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&ClipAction> {
        self.previous.as_ref()
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_ref().map(ClipAction::name)
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    fn actions(&self) -> impl Iterator<Item = &ClipAction> {
        self.previous.iter().chain(self.current.iter())
    }
}

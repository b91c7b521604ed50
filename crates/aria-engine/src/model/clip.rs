//! Keyframed bone animation clips.

use glam::{Quat, Vec3};

use super::descriptor::ClipDescriptor;

#[derive(Debug, Clone)]
pub struct BoneTrack {
    pub bone: String,
    times: Vec<f32>,
    rotations: Vec<Quat>,
    translations: Vec<Vec3>,
}

/// Sampled value of one track at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub rotation: Option<Quat>,
    pub translation: Option<Vec3>,
}

impl BoneTrack {
    /// Linear interpolation between the bracketing keys, slerp for rotations.
    pub fn sample(&self, time: f32) -> TrackSample {
        let (a, b, t) = self.bracket(time);
        TrackSample {
            rotation: (!self.rotations.is_empty())
                .then(|| self.rotations[a].slerp(self.rotations[b], t)),
            translation: (!self.translations.is_empty())
                .then(|| self.translations[a].lerp(self.translations[b], t)),
        }
    }

    fn bracket(&self, time: f32) -> (usize, usize, f32) {
        let last = self.times.len() - 1;
        if time.is_nan() || time <= self.times[0] {
            return (0, 0, 0.0);
        }
        if time >= self.times[last] {
            return (last, last, 0.0);
        }
        let b = self.times.partition_point(|&k| k <= time);
        if b == 0 || b > last {
            return (0, 0, 0.0);
        }
        let a = b - 1;
        let span = self.times[b] - self.times[a];
        let t = if span > 0.0 {
            (time - self.times[a]) / span
        } else {
            0.0
        };
        (a, b, t)
    }
}

#[derive(Debug, Clone)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub looping: bool,
    pub tracks: Vec<BoneTrack>,
}

impl Clip {
    pub(crate) fn from_descriptor(desc: &ClipDescriptor) -> Self {
        let tracks = desc
            .tracks
            .iter()
            .map(|t| BoneTrack {
                bone: t.bone.clone(),
                times: t.times.clone(),
                rotations: t
                    .rotations
                    .iter()
                    .map(|r| Quat::from_array(*r).normalize())
                    .collect(),
                translations: t.translations.iter().map(|v| Vec3::from_array(*v)).collect(),
            })
            .collect();
        Self {
            name: desc.name.clone(),
            duration: desc.duration,
            looping: desc.looping,
            tracks,
        }
    }
}

//! Per-frame expression targets and the persistent smoothed weight map.
//!
//! Controllers never write weights directly. Each frame they propose
//! targets into one [`TargetFrame`]; a later proposal for the same name
//! replaces an earlier one. [`ExpressionWeightMap::blend`] then applies
//! smoothing exactly once per name.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blend {
    /// Ease toward the target at `rate` per second.
    Smooth { rate: f32 },
    /// Write the target as-is.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub value: f32,
    pub blend: Blend,
}

#[derive(Debug, Default)]
pub struct TargetFrame {
    targets: HashMap<String, Target>,
}

impl TargetFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn propose(&mut self, name: &str, value: f32, rate: f32) {
        self.insert(name, value, Blend::Smooth { rate });
    }

    pub fn force(&mut self, name: &str, value: f32) {
        self.insert(name, value, Blend::Direct);
    }

    fn insert(&mut self, name: &str, value: f32, blend: Blend) {
        let target = Target { value, blend };
        match self.targets.get_mut(name) {
            Some(existing) => *existing = target,
            None => {
                self.targets.insert(name.to_string(), target);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Target> {
        self.targets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.targets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Smoothed expression weights, persisted across frames. Absent names read 0.
#[derive(Debug, Default, Clone)]
pub struct ExpressionWeightMap {
    weights: HashMap<String, f32>,
}

impl ExpressionWeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> f32 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: &str, weight: f32) {
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match self.weights.get_mut(name) {
            Some(w) => *w = weight,
            None => {
                self.weights.insert(name.to_string(), weight);
            }
        }
    }

    /// Move every targeted weight toward its target:
    /// `w += (target - w) * min(rate * dt, 1)`.
    pub fn blend(&mut self, frame: &TargetFrame, dt: f32) {
        for (name, target) in frame.iter() {
            let current = self.get(name);
            let next = match target.blend {
                Blend::Direct => target.value,
                Blend::Smooth { rate } => {
                    let alpha = (rate * dt.max(0.0)).min(1.0);
                    current + (target.value - current) * alpha
                }
            };
            self.set(name, next);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn clear(&mut self) {
        self.weights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_weight_reads_zero() {
        let map = ExpressionWeightMap::new();
        assert_eq!(map.get("happy"), 0.0);
    }

    #[test]
    fn smooth_blend_moves_fraction_of_gap() {
        let mut map = ExpressionWeightMap::new();
        let mut frame = TargetFrame::new();
        frame.propose("happy", 1.0, 3.0);
        map.blend(&frame, 0.1);
        assert!((map.get("happy") - 0.3).abs() < 1e-6);
    }

    #[test]
    fn large_dt_never_overshoots() {
        let mut map = ExpressionWeightMap::new();
        let mut frame = TargetFrame::new();
        frame.propose("happy", 1.0, 3.0);
        map.blend(&frame, 10.0);
        assert_eq!(map.get("happy"), 1.0);
    }

    #[test]
    fn later_proposal_replaces_earlier() {
        let mut frame = TargetFrame::new();
        frame.propose("aa", 0.0, 3.0);
        frame.propose("aa", 0.6, 15.0);
        assert_eq!(
            frame.get("aa"),
            Some(Target {
                value: 0.6,
                blend: Blend::Smooth { rate: 15.0 }
            })
        );
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn direct_targets_bypass_smoothing() {
        let mut map = ExpressionWeightMap::new();
        let mut frame = TargetFrame::new();
        frame.force("blink", 0.8);
        map.blend(&frame, 0.001);
        assert_eq!(map.get("blink"), 0.8);
    }

    #[test]
    fn untargeted_weights_hold() {
        let mut map = ExpressionWeightMap::new();
        map.set("sad", 0.4);
        map.blend(&TargetFrame::new(), 1.0);
        assert_eq!(map.get("sad"), 0.4);
    }

    #[test]
    fn weights_stay_in_unit_range() {
        let mut map = ExpressionWeightMap::new();
        map.set("x", 4.0);
        assert_eq!(map.get("x"), 1.0);
        map.set("x", -1.0);
        assert_eq!(map.get("x"), 0.0);
    }
}

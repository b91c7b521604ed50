//! Validation for idle motion, pose correction and clip tables.

use crate::schema::AriaConfig;
use std::f64::consts::PI;

use super::helpers::{validate_non_empty, validate_range_f64};

pub(crate) fn validate_idle(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range_f64(errors, "idle.amplitude", config.idle.amplitude, 0.0, 5.0);
}

pub(crate) fn validate_pose(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range_f64(
        errors,
        "pose.smooth_rate",
        config.pose.smooth_rate,
        0.1,
        100.0,
    );
    validate_range_f64(
        errors,
        "pose.upper_arm_angle",
        config.pose.upper_arm_angle,
        0.0,
        PI,
    );
}

pub(crate) fn validate_clips(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range_f64(errors, "clips.crossfade", config.clips.crossfade, 0.0, 5.0);

    for group in &config.clips.groups {
        validate_non_empty(errors, "clips.groups.name", &group.name);
        if group.triggers.iter().all(|t| t.trim().is_empty()) {
            errors.push(format!("clips.groups.{} has no triggers", group.name));
        }
        if group.candidates.is_empty() {
            errors.push(format!("clips.groups.{} has no candidates", group.name));
        }
        for candidate in &group.candidates {
            if !candidate.weight.is_finite() || candidate.weight <= 0.0 {
                errors.push(format!(
                    "clips.groups.{}.{} weight = {} must be positive",
                    group.name, candidate.clip, candidate.weight
                ));
            }
        }
    }
}

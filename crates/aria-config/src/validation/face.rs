//! Validation for expression blending, blink, lip-sync and gaze tuning.

use crate::schema::AriaConfig;
use std::f64::consts::FRAC_PI_2;

use super::helpers::{validate_non_empty, validate_range, validate_range_f64};

pub(crate) fn validate_animation(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range_f64(
        errors,
        "animation.blend_rate",
        config.animation.blend_rate,
        0.1,
        50.0,
    );
    for name in config.animation.emotions.expressions() {
        validate_non_empty(errors, "animation.emotions entry", name);
    }
}

pub(crate) fn validate_blink(errors: &mut Vec<String>, config: &AriaConfig) {
    let blink = &config.blink;
    validate_range_f64(errors, "blink.duration", blink.duration, 0.05, 1.0);
    validate_range_f64(errors, "blink.min_interval", blink.min_interval, 0.5, 30.0);
    validate_range_f64(errors, "blink.max_interval", blink.max_interval, 0.5, 30.0);
    if blink.max_interval < blink.min_interval {
        errors.push(format!(
            "blink.max_interval = {} must be >= blink.min_interval = {}",
            blink.max_interval, blink.min_interval
        ));
    }
    if blink.duration >= blink.min_interval {
        errors.push("blink.duration must be shorter than blink.min_interval".into());
    }
}

pub(crate) fn validate_lipsync(errors: &mut Vec<String>, config: &AriaConfig) {
    let lipsync = &config.lipsync;
    validate_range(errors, "lipsync.fft_size", lipsync.fft_size, 32, 32768);
    if !lipsync.fft_size.is_power_of_two() {
        errors.push(format!(
            "lipsync.fft_size = {} must be a power of two",
            lipsync.fft_size
        ));
    }
    validate_range_f64(errors, "lipsync.smoothing", lipsync.smoothing, 0.0, 1.0);
    if lipsync.min_decibels >= lipsync.max_decibels {
        errors.push(format!(
            "lipsync.min_decibels = {} must be below lipsync.max_decibels = {}",
            lipsync.min_decibels, lipsync.max_decibels
        ));
    }
    validate_range_f64(errors, "lipsync.threshold", lipsync.threshold, 0.0, 1.0);
    validate_range_f64(errors, "lipsync.curve", lipsync.curve, 0.1, 5.0);
    validate_range_f64(
        errors,
        "lipsync.blend_rate_multiplier",
        lipsync.blend_rate_multiplier,
        1.0,
        20.0,
    );
    for shape in &lipsync.mouth_shapes {
        validate_non_empty(errors, "lipsync.mouth_shapes.keyword", &shape.keyword);
        validate_range_f64(
            errors,
            &format!("lipsync.mouth_shapes.{}.gain", shape.keyword),
            shape.gain,
            0.0,
            1.0,
        );
    }
    validate_range_f64(
        errors,
        "lipsync.jaw.max_angle",
        lipsync.jaw.max_angle,
        0.0,
        1.0,
    );
}

pub(crate) fn validate_gaze(errors: &mut Vec<String>, config: &AriaConfig) {
    let gaze = &config.gaze;
    validate_range_f64(errors, "gaze.ease_rate", gaze.ease_rate, 0.1, 50.0);
    validate_range_f64(errors, "gaze.distance", gaze.distance, 0.1, 100.0);
    validate_range_f64(errors, "gaze.max_yaw", gaze.max_yaw, 0.0, FRAC_PI_2);
    validate_range_f64(errors, "gaze.max_pitch", gaze.max_pitch, 0.0, FRAC_PI_2);
    validate_range_f64(errors, "gaze.camera.fov", gaze.camera.fov, 10.0, 120.0);
    if gaze.camera.position == gaze.camera.look_at {
        errors.push("gaze.camera.look_at must differ from gaze.camera.position".into());
    }
}

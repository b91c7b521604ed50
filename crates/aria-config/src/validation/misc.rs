//! Validation for smaller config sections: audio, characters, service
//! and performance.

use crate::schema::{AriaConfig, ServiceMode};
use std::collections::HashSet;

use super::helpers::{validate_non_empty, validate_range, validate_range_f64};

pub(crate) fn validate_audio(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range_f64(errors, "audio.gain", config.audio.gain, 0.0, 2.0);
    validate_range_f64(
        errors,
        "audio.autoplay_timeout",
        config.audio.autoplay_timeout,
        0.5,
        60.0,
    );
}

/// Character ids must be unique and the default must exist.
pub(crate) fn validate_characters(errors: &mut Vec<String>, config: &AriaConfig) {
    let characters = &config.characters;
    if characters.roster.is_empty() {
        errors.push("characters.roster must not be empty".into());
        return;
    }

    let mut seen = HashSet::new();
    for character in &characters.roster {
        validate_non_empty(errors, "characters.roster.id", &character.id);
        if !seen.insert(character.id.as_str()) {
            errors.push(format!("duplicate character id '{}'", character.id));
        }
    }

    if characters.find(&characters.default).is_none() {
        errors.push(format!(
            "characters.default '{}' is not in the roster",
            characters.default
        ));
    }
}

pub(crate) fn validate_service(errors: &mut Vec<String>, config: &AriaConfig) {
    let service = &config.service;
    validate_range(errors, "service.timeout_secs", service.timeout_secs, 1, 300);
    validate_non_empty(errors, "service.fallback_text", &service.fallback_text);
    match service.mode {
        ServiceMode::Endpoint => {
            validate_non_empty(errors, "service.endpoint_url", &service.endpoint_url)
        }
        ServiceMode::OpenAi => {
            validate_non_empty(errors, "service.base_url", &service.base_url);
            validate_non_empty(errors, "service.chat_model", &service.chat_model);
        }
    }
}

pub(crate) fn validate_performance(errors: &mut Vec<String>, config: &AriaConfig) {
    validate_range(
        errors,
        "performance.frame_rate",
        config.performance.frame_rate,
        15,
        240,
    );
    validate_range_f64(
        errors,
        "performance.frame_budget_ms",
        config.performance.frame_budget_ms,
        1.0,
        100.0,
    );
}

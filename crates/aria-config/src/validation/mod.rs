//! Full configuration validation.
//!
//! Validates numeric ranges, table consistency and the character roster.
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod face;
mod helpers;
mod misc;
mod motion;


use crate::schema::AriaConfig;
use aria_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AriaConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    face::validate_animation(&mut errors, config);
    face::validate_blink(&mut errors, config);
    face::validate_lipsync(&mut errors, config);
    face::validate_gaze(&mut errors, config);
    motion::validate_idle(&mut errors, config);
    motion::validate_pose(&mut errors, config);
    motion::validate_clips(&mut errors, config);
    misc::validate_audio(&mut errors, config);
    misc::validate_characters(&mut errors, config);
    misc::validate_service(&mut errors, config);
    misc::validate_performance(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

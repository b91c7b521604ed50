//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use aria_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_aria_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[gaze]
max_yaw = 0.3

[service]
mode = "openai"
voice = "shimmer"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert!((config.gaze.max_yaw - 0.3).abs() < f64::EPSILON);
    assert_eq!(config.service.voice, "shimmer");
    assert_eq!(config.service.mode, crate::schema::ServiceMode::OpenAi);
    // Defaults preserved
    assert!((config.gaze.max_pitch - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.characters.default, "test");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_returns_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[blink]\nduration = 9.0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert!((config.blink.duration - 9.0).abs() < f64::EPSILON);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aria").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.characters.roster.len(), 2);
    assert_eq!(config.lipsync.fft_size, 256);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::AriaConfig;

    let config: AriaConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("aria"));
        assert!(path_str.ends_with("config.toml"));
    }
}

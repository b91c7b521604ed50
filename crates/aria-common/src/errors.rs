use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures inside the audio decode/playback graph.
///
/// None of these ever reach the frame loop; the lifecycle manager
/// converts them into state transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("audio decode error: {0}")]
    Decode(String),

    #[error("playback not allowed without a user gesture")]
    NotAllowed,

    #[error("playback not supported: {0}")]
    NotSupported(String),

    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio graph already released")]
    Released,
}

/// Structural gaps between what the animation core expects and what
/// a loaded rig actually provides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("bone not found: {0}")]
    MissingBone(String),

    #[error("expression not found: {0}")]
    MissingExpression(String),

    #[error("clip not found: {0}")]
    MissingClip(String),

    #[error("invalid rig descriptor: {0}")]
    InvalidDescriptor(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AriaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Rig(#[from] RigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("{0}")]
    Other(String),
}

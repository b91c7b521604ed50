//! Per-frame orchestration of every animation controller.

mod orchestrator;
mod source;

pub use orchestrator::{FrameOrchestrator, FrameReport};
pub use source::{ConstantVolume, Silence, VolumeSource};

#[cfg(test)]
mod tests;

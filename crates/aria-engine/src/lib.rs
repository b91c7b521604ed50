//! Animation core for Aria.
//!
//! Every display frame the [`FrameOrchestrator`] gathers target
//! contributions from the expression blender, blink controller and
//! lip-sync, blends them once, drives gaze and commits the model. Skeleton
//! characters then get pose correction and idle motion; clip characters
//! are driven by the clip mixer instead.

pub mod blink;
pub mod clips;
pub mod expression;
pub mod frame;
pub mod gaze;
pub mod idle;
pub mod lipsync;
pub mod model;
pub mod perf;
pub mod pose;
pub mod stage;
pub mod warn_once;
pub mod weights;

pub use blink::{BlinkController, BlinkState};
pub use clips::{ClipPlayer, ClipTables, Mixer};
pub use expression::ExpressionBlender;
pub use frame::{ConstantVolume, FrameOrchestrator, FrameReport, Silence, VolumeSource};
pub use gaze::{Camera, GazeController};
pub use idle::{IdleMotion, IdleOffsets};
pub use lipsync::LipSync;
pub use model::{AvatarModel, BoneRole, RigDescriptor, RigMap};
pub use perf::FrameTimer;
pub use pose::PoseCorrector;
pub use stage::{ActiveCharacter, Stage};
pub use warn_once::WarnOnce;
pub use weights::{ExpressionWeightMap, TargetFrame};

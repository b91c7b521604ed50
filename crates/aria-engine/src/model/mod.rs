//! Avatar model: rig descriptor, skeleton, bone roles, expressions, clips.

mod avatar;
mod clip;
mod descriptor;
mod expressions;
mod rig_map;
mod skeleton;

pub use avatar::*;
pub use clip::*;
pub use descriptor::*;
pub use expressions::*;
pub use rig_map::*;
pub use skeleton::*;

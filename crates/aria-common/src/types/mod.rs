mod chat;
mod core;
mod emotion;

pub use self::core::*;
pub use chat::*;
pub use emotion::*;

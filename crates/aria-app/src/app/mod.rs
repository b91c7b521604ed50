//! Host state: wires terminal input, the conversation task, speech
//! playback and the frame orchestrator into one loop.

mod audio;
mod conversation;
mod core;
mod dispatch;
mod frame;
mod shutdown;
mod types;

pub use self::core::AvatarApp;

#[cfg(test)]
mod tests;

//! Speech playback for Aria: decoding, the audio lifecycle state machine,
//! live loudness analysis and output sinks.

pub mod analyser;
pub mod decode;
pub mod lifecycle;
pub mod output;

#[cfg(test)]
mod test_util;

pub use analyser::SpectrumAnalyser;
pub use decode::{decode, DecodedAudio};
pub use lifecycle::{AudioEvent, AudioManager, AudioNotice, AudioState};
pub use output::{AudioOutput, ClockOutput};

#[cfg(feature = "device")]
pub use output::CpalOutput;

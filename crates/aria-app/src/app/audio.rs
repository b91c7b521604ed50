//! Output selection and audio notices.

use aria_audio::{AudioNotice, AudioOutput, ClockOutput};
use aria_common::Event;
use aria_config::schema::{AudioConfig, OutputKind};

use super::core::AvatarApp;

pub(super) fn select_output(audio: &AudioConfig) -> Box<dyn AudioOutput> {
    match audio.output {
        OutputKind::Clock => clock_output(audio),
        OutputKind::Device => device_output(audio),
    }
}

fn clock_output(audio: &AudioConfig) -> Box<dyn AudioOutput> {
    if audio.simulate_autoplay_block {
        tracing::info!("clock output will reject playback until the first click");
    }
    Box::new(ClockOutput::with_autoplay_block(audio.simulate_autoplay_block))
}

#[cfg(feature = "device")]
fn device_output(audio: &AudioConfig) -> Box<dyn AudioOutput> {
    match aria_audio::CpalOutput::new() {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::warn!(error = %e, "no audio device, falling back to the clock output");
            clock_output(audio)
        }
    }
}

#[cfg(not(feature = "device"))]
fn device_output(audio: &AudioConfig) -> Box<dyn AudioOutput> {
    tracing::info!("built without the `device` feature, using the clock output");
    clock_output(audio)
}

impl AvatarApp {
    /// Forward lifecycle notices to the orchestrator and the event bus.
    pub(super) fn drain_audio_notices(&mut self) {
        for notice in self.audio.drain_notices() {
            match notice {
                AudioNotice::Started => {
                    tracing::info!("speech started");
                    self.bus.publish(Event::AudioStarted);
                }
                AudioNotice::Stopped => {
                    self.orchestrator.audio_stopped(&mut self.stage);
                    self.bus.publish(Event::AudioStopped);
                }
            }
        }
    }
}

//! Graceful shutdown: stop speech, release the model, close channels.

use aria_audio::AudioEvent;
use aria_common::Event;

use super::core::AvatarApp;

impl AvatarApp {
    /// Order matters:
    /// 1. Tear down audio (stops output, disarms a pending retry)
    /// 2. Detach the model (stops the clip mixer)
    /// 3. Drop channels so the conversation task and reload watcher end
    pub fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        self.audio.handle(AudioEvent::TeardownRequested, self.now());
        self.drain_audio_notices();

        self.stage.detach();

        self.conversation_tx = None;
        self.conversation_rx = None;
        self.awaiting_reply = false;
        self.config_rx = None;

        self.bus.publish(Event::Shutdown);
        tracing::info!(frames = self.orchestrator.frames(), "Graceful shutdown complete");
    }
}

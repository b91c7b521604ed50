//! Command dispatch and character switching.

use aria_audio::AudioEvent;
use aria_common::{CharacterId, Event, Viewport};

use super::core::AvatarApp;
use crate::input::Command;

impl AvatarApp {
    pub fn handle_command(&mut self, command: Command) {
        let now = self.now();
        match command {
            Command::Say(text) => {
                self.send_message(&text);
            }
            Command::Click => {
                self.audio.handle(AudioEvent::UserInteracted, now);
                self.drain_audio_notices();
            }
            Command::Look { x, y } => {
                if !self.orchestrator.pointer_moved(x, y, self.viewport) {
                    tracing::debug!(x, y, "pointer ignored");
                }
            }
            Command::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.viewport = Viewport::new(width, height);
                    tracing::debug!(width, height, "viewport resized");
                } else {
                    tracing::warn!(width, height, "ignoring degenerate viewport");
                }
            }
            Command::Character(id) => {
                self.switch_character(&id);
            }
            Command::Clip => match self.orchestrator.trigger_clip(&mut self.stage) {
                Some(clip) => tracing::info!(%clip, "clip triggered"),
                None => tracing::info!("no clip to trigger for this character"),
            },
            Command::Emotion(emotion) => {
                self.orchestrator.set_emotion(emotion);
                self.bus.publish(Event::EmotionChanged(emotion));
            }
            Command::Quit => {
                tracing::info!("quit requested");
                self.running = false;
            }
        }
    }

    /// Load a character from the roster, tearing down speech and the
    /// previous model first. Returns whether `id` is now active.
    pub fn switch_character(&mut self, id: &str) -> bool {
        if self
            .stage
            .active()
            .is_some_and(|active| active.id.as_str() == id)
        {
            tracing::info!(character = id, "character already active");
            return true;
        }
        let Some(character) = self.config.characters.find(id).cloned() else {
            tracing::warn!(
                character = id,
                known = ?self.config.characters.roster.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
                "unknown character"
            );
            return false;
        };

        self.audio.handle(AudioEvent::TeardownRequested, self.now());
        self.drain_audio_notices();

        match self.stage.load(&character) {
            Ok(()) => {
                tracing::info!(character = id, driver = ?character.driver, "character loaded");
                self.bus
                    .publish(Event::CharacterSwitched(CharacterId::new(id)));
                true
            }
            Err(e) => {
                tracing::error!(character = id, error = %e, "failed to load character");
                false
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{CharacterId, Emotion};

/// Host-level notifications about the avatar.
///
/// The frame loop never reads these; they exist so that UI surfaces
/// (transcript, input box) can follow what the avatar is doing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ConfigReloaded,
    EmotionChanged(Emotion),
    AudioStarted,
    AudioStopped,
    CharacterSwitched(CharacterId),
    AssistantReply { text: String },
    ServiceFailed(String),
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

//! Background conversation task and reply handling.

use std::sync::mpsc;

use async_trait::async_trait;

use aria_ai::{AiError, AssistantReply, ConversationClient, Session};
use aria_audio::AudioEvent;
use aria_common::{ChatTurn, Event};
use aria_config::schema::ServiceConfig;

use super::core::AvatarApp;
use super::types::ConversationEvent;

/// Owns the session and the client; one request at a time.
pub(super) async fn conversation_task(
    service: ServiceConfig,
    user_rx: mpsc::Receiver<String>,
    event_tx: mpsc::Sender<ConversationEvent>,
) {
    let client: Box<dyn ConversationClient> = match aria_ai::client_from_config(&service) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "conversation service unavailable, replies will use the fallback turn");
            Box::new(Unavailable(e.to_string()))
        }
    };
    let mut session = Session::from_config(&service);

    while let Ok(text) = tokio::task::block_in_place(|| user_rx.recv()) {
        let event = match session.send(client.as_ref(), &text).await {
            Ok(reply) => ConversationEvent::Reply(reply),
            Err(AiError::Busy | AiError::EmptyMessage) => continue,
            Err(e) => ConversationEvent::Failed {
                fallback: session.fallback_reply(),
                error: e.to_string(),
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
    tracing::debug!(turns = session.turn_count(), "conversation task finished");
}

/// Stands in when the configured client could not be built, so every
/// message still gets the fallback turn.
struct Unavailable(String);

#[async_trait]
impl ConversationClient for Unavailable {
    async fn respond(&self, _history: &[ChatTurn]) -> Result<AssistantReply, AiError> {
        Err(AiError::NotConfigured(self.0.clone()))
    }
}

impl AvatarApp {
    /// Spawn the conversation task on `runtime`.
    pub fn start_conversation(&mut self, runtime: &tokio::runtime::Handle) {
        if self.conversation_tx.is_some() {
            return;
        }
        let (user_tx, user_rx) = mpsc::channel::<String>();
        let (event_tx, event_rx) = mpsc::channel::<ConversationEvent>();
        self.conversation_tx = Some(user_tx);
        self.conversation_rx = Some(event_rx);
        runtime.spawn(conversation_task(
            self.config.service.clone(),
            user_rx,
            event_tx,
        ));
        tracing::info!(mode = ?self.config.service.mode, "conversation task started");
    }

    /// Send a user message. Refused while a reply is pending or the
    /// avatar is speaking.
    pub fn send_message(&mut self, text: &str) -> bool {
        if !self.accepts_input() {
            tracing::info!("avatar is busy, message ignored");
            return false;
        }
        let Some(tx) = self.conversation_tx.as_ref() else {
            tracing::warn!("conversation task not running, message dropped");
            return false;
        };
        if tx.send(text.to_string()).is_err() {
            tracing::warn!("conversation task has stopped, message dropped");
            self.conversation_tx = None;
            return false;
        }
        self.awaiting_reply = true;
        true
    }

    pub(super) fn poll_conversation(&mut self, now: f64) {
        let Some(rx) = self.conversation_rx.as_ref() else {
            return;
        };
        let mut events = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            tracing::warn!("conversation task ended");
            self.conversation_rx = None;
            self.conversation_tx = None;
            self.awaiting_reply = false;
        }
        for event in events {
            self.handle_conversation_event(event, now);
        }
    }

    pub(super) fn handle_conversation_event(&mut self, event: ConversationEvent, now: f64) {
        self.awaiting_reply = false;
        match event {
            ConversationEvent::Reply(reply) => {
                println!("aria> {}", reply.text);
                if let Some(clip) =
                    self.orchestrator
                        .on_response(&reply.text, reply.emotion, &mut self.stage)
                {
                    tracing::info!(%clip, "response clip started");
                }
                self.bus.publish(Event::EmotionChanged(reply.emotion));
                self.bus.publish(Event::AssistantReply {
                    text: reply.text.clone(),
                });
                match reply.audio {
                    Some(bytes) if !bytes.is_empty() => {
                        self.audio.handle(AudioEvent::PayloadReceived(bytes), now);
                        self.drain_audio_notices();
                    }
                    _ => tracing::debug!("reply has no audio"),
                }
            }
            ConversationEvent::Failed { fallback, error } => {
                println!("aria> {}", fallback.text);
                self.bus.publish(Event::ServiceFailed(error));
                self.bus.publish(Event::AssistantReply {
                    text: fallback.text,
                });
            }
        }
    }
}

//! Conversation session.
//!
//! A `Session` owns the turn history sent to the service and guarantees
//! that every user turn is followed by an assistant turn, using the
//! configured fallback text when the service fails.

mod chat;
mod guard;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aria_common::{ChatTurn, SessionId};
use aria_config::schema::ServiceConfig;

use crate::AssistantReply;

pub struct Session {
    id: SessionId,
    turns: Vec<ChatTurn>,
    fallback_text: String,
    busy: Arc<AtomicBool>,
}

impl Session {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            turns: Vec::new(),
            fallback_text: fallback_text.into(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(service: &ServiceConfig) -> Self {
        Self::new(service.fallback_text.clone())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn fallback_reply(&self) -> AssistantReply {
        AssistantReply::fallback(self.fallback_text.clone())
    }

    /// Shared flag that is set while a request is in flight. Input
    /// surfaces read it to refuse new messages.
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

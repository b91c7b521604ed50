//! Internal types and constants for the host.

use aria_ai::AssistantReply;
use aria_common::Viewport;

/// Results delivered by the conversation task.
#[derive(Debug)]
pub(crate) enum ConversationEvent {
    Reply(AssistantReply),
    /// The service failed; `fallback` is the turn already appended to
    /// the history.
    Failed {
        fallback: AssistantReply,
        error: String,
    },
}

/// Pointer coordinates from `:look` are interpreted in this space until
/// a `:resize` arrives.
pub(super) const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};

pub(super) const EVENT_BUS_CAPACITY: usize = 64;

use aria_common::ChatTurn;

use super::guard::BusyGuard;
use super::Session;
use crate::{AiError, AssistantReply, ConversationClient};

impl Session {
    /// Append a user turn and ask the service for the next assistant turn.
    ///
    /// On failure the fallback assistant turn is appended before the error
    /// is returned, so the history always alternates. A blank message or a
    /// request while another is in flight is refused without touching the
    /// history.
    pub async fn send(
        &mut self,
        client: &dyn ConversationClient,
        user_text: &str,
    ) -> Result<AssistantReply, AiError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(AiError::EmptyMessage);
        }

        let busy = self.busy_flag();
        let _guard = BusyGuard::acquire(&busy)?;

        self.turns.push(ChatTurn::user(text));
        let cid = aria_common::new_correlation_id();
        tracing::info!(session = %self.id(), %cid, turns = self.turns.len(), "sending conversation");

        match client.respond(&self.turns).await {
            Ok(reply) => {
                tracing::info!(
                    %cid,
                    emotion = %reply.emotion,
                    has_audio = reply.has_audio(),
                    "assistant replied"
                );
                self.turns.push(ChatTurn::assistant(reply.text.clone()));
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(%cid, error = %e, "conversation request failed, using fallback turn");
                let fallback = self.fallback_reply();
                self.turns.push(ChatTurn::assistant(fallback.text));
                Err(e)
            }
        }
    }
}

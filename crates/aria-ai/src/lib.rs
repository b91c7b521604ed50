//! Conversation backends for Aria.
//!
//! Provides:
//! - An HTTP endpoint client speaking the `{messages}` → `{text, emotion, audio}` protocol
//! - An OpenAI-compatible client (JSON-mode chat completion followed by TTS)
//! - A conversation session that keeps history and falls back to a fixed turn on failure

pub mod endpoint;
pub mod openai;
pub mod reply;
pub mod session;

use async_trait::async_trait;

use aria_common::ChatTurn;
use aria_config::schema::{ServiceConfig, ServiceMode};

pub use endpoint::HttpEndpointClient;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use reply::{AssistantReply, ReplyPayload};
pub use session::Session;

/// Produces the assistant's next turn from the conversation so far.
#[async_trait]
pub trait ConversationClient: Send + Sync {
    async fn respond(&self, history: &[ChatTurn]) -> Result<AssistantReply, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Not configured: {0}")]
    NotConfigured(String),
    #[error("Timeout")]
    Timeout,
    #[error("a request is already in flight")]
    Busy,
    #[error("message is empty")]
    EmptyMessage,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::ParseError(e.to_string())
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}

/// Build the client selected by `service.mode`.
pub fn client_from_config(service: &ServiceConfig) -> Result<Box<dyn ConversationClient>, AiError> {
    Ok(match service.mode {
        ServiceMode::Endpoint => Box::new(HttpEndpointClient::from_config(service)?),
        ServiceMode::OpenAi => Box::new(OpenAiClient::new(OpenAiConfig::from_service(service)?)?),
    })
}

pub(crate) fn http_client(timeout_secs: u32) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(u64::from(timeout_secs.max(1))))
        .build()
        .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))
}

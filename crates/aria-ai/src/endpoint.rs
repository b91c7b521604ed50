//! Client for a single conversation endpoint.
//!
//! POSTs `{"messages": [{role, content}, ...]}` and expects
//! `{"text", "emotion", "audio"}` back, or `{"error"}` on failure.

use async_trait::async_trait;
use serde::Serialize;

use aria_common::ChatTurn;
use aria_config::schema::ServiceConfig;

use crate::{AiError, AssistantReply, ConversationClient, ReplyPayload};

pub struct HttpEndpointClient {
    url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct EndpointRequest<'a> {
    messages: &'a [ChatTurn],
}

impl HttpEndpointClient {
    pub fn new(url: impl Into<String>, timeout_secs: u32) -> Result<Self, AiError> {
        Ok(Self {
            url: url.into(),
            http: crate::http_client(timeout_secs)?,
        })
    }

    pub fn from_config(service: &ServiceConfig) -> Result<Self, AiError> {
        Self::new(service.endpoint_url.clone(), service.timeout_secs)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConversationClient for HttpEndpointClient {
    async fn respond(&self, history: &[ChatTurn]) -> Result<AssistantReply, AiError> {
        tracing::debug!(url = %self.url, turns = history.len(), "posting conversation");

        let response = self
            .http
            .post(&self.url)
            .json(&EndpointRequest { messages: history })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Failure bodies carry `{"error": "..."}` when the endpoint is ours.
            let message = serde_json::from_str::<ReplyPayload>(&body)
                .ok()
                .and_then(|p| p.error)
                .unwrap_or(body);
            return Err(AiError::ApiError(format!("HTTP {status}: {message}")));
        }

        let payload: ReplyPayload =
            serde_json::from_str(&body).map_err(|e| AiError::ParseError(e.to_string()))?;
        let reply = payload.into_reply()?;

        tracing::debug!(
            emotion = %reply.emotion,
            chars = reply.text.len(),
            audio_bytes = reply.audio.as_ref().map_or(0, Vec::len),
            "endpoint replied"
        );
        Ok(reply)
    }
}

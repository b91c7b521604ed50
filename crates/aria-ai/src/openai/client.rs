//! Chat completion and speech requests.

use async_trait::async_trait;
use serde::Deserialize;

use aria_common::{ChatTurn, Emotion};

use super::config::OpenAiConfig;
use crate::{AiError, AssistantReply, ConversationClient, ReplyPayload};

/// Appended to the history so the model answers in the reply shape.
pub(crate) const FORMAT_INSTRUCTION: &str = "Respond with a JSON object of the form \
{\"text\": \"<your reply>\", \"emotion\": \"<one of: happy, sad, angry, neutral, surprised>\"}. \
Pick the emotion that best matches the tone of your reply.";

pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = crate::http_client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub(crate) fn build_chat_body(&self, history: &[ChatTurn]) -> serde_json::Value {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": FORMAT_INSTRUCTION,
        })];
        messages.extend(history.iter().map(|turn| {
            serde_json::json!({
                "role": turn.role,
                "content": turn.content,
            })
        }));

        serde_json::json!({
            "model": self.config.chat_model,
            "messages": messages,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
        })
    }

    async fn complete(&self, history: &[ChatTurn]) -> Result<(String, Emotion), AiError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&self.build_chat_body(history))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AiError::ApiError("rate limited".into()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {body}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::ParseError("completion has no content".into()))?;

        let payload: ReplyPayload = serde_json::from_str(&content)
            .map_err(|e| AiError::ParseError(format!("completion is not reply JSON: {e}")))?;
        let reply = payload.into_reply()?;
        Ok((reply.text, reply.emotion))
    }

    async fn speak(&self, text: &str) -> Result<Vec<u8>, AiError> {
        let response = self
            .http
            .post(format!("{}/audio/speech", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "model": self.config.tts_model,
                "voice": self.config.voice,
                "input": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::ApiError(format!("speech HTTP {status}")));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ConversationClient for OpenAiClient {
    async fn respond(&self, history: &[ChatTurn]) -> Result<AssistantReply, AiError> {
        let (text, emotion) = self.complete(history).await?;
        tracing::debug!(%emotion, chars = text.len(), "completion parsed");

        // A speech failure still yields a text-only turn.
        let audio = match self.speak(&text).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed, replying without audio");
                None
            }
        };

        Ok(AssistantReply {
            text,
            emotion,
            audio,
        })
    }
}

//! Conversation and speech service configuration types.

use serde::{Deserialize, Serialize};

/// Which backend produces replies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ServiceMode {
    /// A single HTTP endpoint returning `{text, emotion, audio}`.
    #[default]
    Endpoint,
    /// OpenAI-compatible chat completion plus speech synthesis.
    OpenAi,
}

/// Conversation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub mode: ServiceMode,
    pub endpoint_url: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub chat_model: String,
    pub tts_model: String,
    pub voice: String,
    pub timeout_secs: u32,
    /// Assistant turn shown when a request fails.
    pub fallback_text: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mode: ServiceMode::Endpoint,
            endpoint_url: "http://localhost:3000/api/chat".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            chat_model: "gpt-4o-mini".into(),
            tts_model: "tts-1".into(),
            voice: "nova".into(),
            timeout_secs: 30,
            fallback_text: "Sorry, something went wrong. Please try again!".into(),
        }
    }
}

//! OpenAI-compatible client configuration.

use std::fmt;

use aria_config::schema::ServiceConfig;

use crate::AiError;

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub tts_model: String,
    pub voice: String,
    pub temperature: f64,
    pub timeout_secs: u32,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = ServiceConfig::default();
        Self {
            api_key: api_key.into(),
            base_url: defaults.base_url,
            chat_model: defaults.chat_model,
            tts_model: defaults.tts_model,
            voice: defaults.voice,
            temperature: 0.7,
            timeout_secs: defaults.timeout_secs,
        }
    }

    /// Build from the service section, reading the key from the
    /// environment variable it names.
    pub fn from_service(service: &ServiceConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&service.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AiError::NotConfigured(format!("{} is not set", service.api_key_env))
            })?;

        Ok(Self {
            api_key,
            base_url: service.base_url.trim_end_matches('/').to_string(),
            chat_model: service.chat_model.clone(),
            tts_model: service.tts_model.clone(),
            voice: service.voice.clone(),
            temperature: 0.7,
            timeout_secs: service.timeout_secs,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

//! OpenAI-compatible backend: a JSON-mode chat completion produces
//! `{text, emotion}`, then the speech endpoint voices the text.

mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;

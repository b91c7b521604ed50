//! The assistant turn and its wire form.

use base64::Engine;
use serde::{Deserialize, Serialize};

use aria_common::Emotion;

/// One assistant turn: spoken text, the emotion to show, and optional speech audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub emotion: Emotion,
    /// Encoded audio bytes (mp3 from the TTS step). `None` when speech failed.
    pub audio: Option<Vec<u8>>,
}

impl AssistantReply {
    pub fn new(text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            emotion,
            audio: None,
        }
    }

    /// The turn shown when the service could not be reached.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self::new(text, Emotion::Neutral)
    }

    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| !a.is_empty())
    }
}

/// JSON body returned by a conversation endpoint.
///
/// `audio` is base64; an empty string means speech synthesis failed
/// but the text is still usable. `error` is set on failure responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyPayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyPayload {
    /// Convert to a reply. Unknown emotions become `Neutral`; undecodable
    /// audio is dropped with a warning.
    pub fn into_reply(self) -> Result<AssistantReply, crate::AiError> {
        if let Some(error) = self.error {
            return Err(crate::AiError::ApiError(error));
        }
        let text = self
            .text
            .ok_or_else(|| crate::AiError::ParseError("reply has no text".into()))?;
        let emotion = aria_common::Emotion::from_wire(self.emotion.as_deref());

        let audio = match self.audio.as_deref() {
            None | Some("") => None,
            Some(encoded) => match base64::engine::general_purpose::STANDARD.decode(encoded) {
                Ok(bytes) if !bytes.is_empty() => Some(bytes),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "reply audio is not valid base64, dropping");
                    None
                }
            },
        };

        Ok(AssistantReply {
            text,
            emotion,
            audio,
        })
    }
}

pub(crate) fn encode_audio(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ReplyPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_reply_decodes_audio() {
        let encoded = encode_audio(&[1, 2, 3, 4]);
        let reply = payload(&format!(
            r#"{{"text":"Hi!","emotion":"happy","audio":"{encoded}"}}"#
        ))
        .into_reply()
        .unwrap();
        assert_eq!(reply.text, "Hi!");
        assert_eq!(reply.emotion, Emotion::Happy);
        assert_eq!(reply.audio.as_deref(), Some(&[1u8, 2, 3, 4][..]));
        assert!(reply.has_audio());
    }

    #[test]
    fn empty_audio_means_text_only() {
        let reply = payload(r#"{"text":"Hmm.","emotion":"sad","audio":""}"#)
            .into_reply()
            .unwrap();
        assert_eq!(reply.emotion, Emotion::Sad);
        assert!(reply.audio.is_none());
        assert!(!reply.has_audio());
    }

    #[test]
    fn unknown_or_missing_emotion_is_neutral() {
        let reply = payload(r#"{"text":"ok","emotion":"ecstatic"}"#)
            .into_reply()
            .unwrap();
        assert_eq!(reply.emotion, Emotion::Neutral);

        let reply = payload(r#"{"text":"ok"}"#).into_reply().unwrap();
        assert_eq!(reply.emotion, Emotion::Neutral);
    }

    #[test]
    fn bad_base64_is_dropped_not_fatal() {
        let reply = payload(r#"{"text":"ok","audio":"@@not base64@@"}"#)
            .into_reply()
            .unwrap();
        assert!(reply.audio.is_none());
    }

    #[test]
    fn error_field_is_an_api_error() {
        let err = payload(r#"{"error":"upstream down"}"#)
            .into_reply()
            .unwrap_err();
        assert!(matches!(err, crate::AiError::ApiError(ref m) if m == "upstream down"));
    }

    #[test]
    fn missing_text_is_a_parse_error() {
        let err = payload(r#"{"emotion":"happy"}"#).into_reply().unwrap_err();
        assert!(matches!(err, crate::AiError::ParseError(_)));
    }
}

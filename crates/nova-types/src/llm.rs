//! Generation request/response types for Nova.
//!
//! These types model the data shapes for backend interactions: completion
//! requests, streaming events, the backend selector, the fragments handed to
//! front ends, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chat::TurnRole;

/// Role of a message in a backend conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// A single message in a backend conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to a generation backend.
///
/// The system instruction travels separately from `messages`; adapters
/// decide how to place it on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub stream: bool,
}

/// Token usage reported by a backend at the end of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted by a backend during a streaming response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the backend.
    Connected,

    /// A piece of generated text.
    TextDelta { text: String },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Which backend a generation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "lowercase")]
pub enum Backend {
    /// The local runtime with the session's selected model.
    Local(String),
    /// The single fixed remote model.
    Remote,
}

impl Backend {
    /// Short label used in logs and error fragments.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Local(_) => "local",
            Backend::Remote => "remote",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Local(model) => write!(f, "local:{model}"),
            Backend::Remote => write!(f, "remote"),
        }
    }
}

/// Coarse classification of a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The backend is not configured or cannot exist in this process.
    Unavailable,
    /// The named local model is not installed.
    NotProvisioned,
    /// Network, HTTP, decode or timeout failure. The caller may re-issue.
    Transient,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Unavailable => write!(f, "unavailable"),
            FailureKind::NotProvisioned => write!(f, "not_provisioned"),
            FailureKind::Transient => write!(f, "transient"),
        }
    }
}

/// Whether a fragment is generated content or an error report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "failure", rename_all = "snake_case")]
pub enum FragmentKind {
    Content,
    Error(FailureKind),
}

/// A non-empty piece of text delivered to a front end.
///
/// Error reports travel through the same channel as content so plain-text
/// consumers can simply print `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
}

impl Fragment {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FragmentKind::Content,
        }
    }

    pub fn error(kind: FailureKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FragmentKind::Error(kind),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, FragmentKind::Error(_))
    }
}

/// Final result of a generation, available once its stream has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Completed,
    Failed(FailureKind),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Completed)
    }
}

/// Errors from generation backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model '{model}' is not installed")]
    ModelNotProvisioned { model: String },

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl LlmError {
    /// Map the error onto the three failure classes front ends distinguish.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            LlmError::ModelNotProvisioned { .. } => FailureKind::NotProvisioned,
            LlmError::Unavailable(_) => FailureKind::Unavailable,
            _ => FailureKind::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_from_turn_role() {
        assert_eq!(MessageRole::from(TurnRole::User), MessageRole::User);
        assert_eq!(MessageRole::from(TurnRole::Assistant), MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_rejects_unknown() {
        assert!("tool".parse::<MessageRole>().is_err());
        assert_eq!("SYSTEM".parse::<MessageRole>().unwrap(), MessageRole::System);
    }

    #[test]
    fn test_stream_event_serde_tag() {
        let ev = StreamEvent::TextDelta {
            text: "hi".to_string(),
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(json, r#"{"type":"text_delta","text":"hi"}"#);
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Local("phi3:mini".into()).to_string(), "local:phi3:mini");
        assert_eq!(Backend::Remote.to_string(), "remote");
        assert_eq!(Backend::Remote.label(), "remote");
    }

    #[test]
    fn test_failure_kind_mapping() {
        let missing = LlmError::ModelNotProvisioned {
            model: "llava".into(),
        };
        assert_eq!(missing.failure_kind(), FailureKind::NotProvisioned);
        assert_eq!(
            LlmError::Unavailable("no key".into()).failure_kind(),
            FailureKind::Unavailable
        );
        assert_eq!(
            LlmError::Timeout { after_ms: 10 }.failure_kind(),
            FailureKind::Transient
        );
        assert_eq!(
            LlmError::AuthenticationFailed.failure_kind(),
            FailureKind::Transient
        );
    }

    #[test]
    fn test_fragment_constructors() {
        assert!(!Fragment::content("a").is_error());
        let err = Fragment::error(FailureKind::Transient, "boom");
        assert!(err.is_error());
        assert_eq!(err.kind, FragmentKind::Error(FailureKind::Transient));
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&GenerationOutcome::Failed(FailureKind::NotProvisioned))
            .unwrap();
        assert_eq!(json, r#"{"status":"failed","failure":"not_provisioned"}"#);
        assert!(GenerationOutcome::Completed.is_success());
    }
}

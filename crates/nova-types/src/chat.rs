//! Conversation types: utterances, turns and input modes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized piece of user input.
///
/// Text is lower-cased and trimmed on construction; the value never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    text: String,
    received_at: DateTime<Utc>,
}

impl Utterance {
    /// Normalize raw input into an utterance stamped with the current time.
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_lowercase(),
            received_at: Utc::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Who produced a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// One immutable entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    /// Position of this turn in the lifetime of its store. Never reused,
    /// even after eviction or a clear.
    pub ordinal: u64,
}

/// How the terminal front end collects utterances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Voice,
    Text,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Voice => write!(f, "voice"),
            InputMode::Text => write!(f, "text"),
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voice" => Ok(InputMode::Voice),
            "text" => Ok(InputMode::Text),
            other => Err(format!("invalid input mode: '{other}'")),
        }
    }
}

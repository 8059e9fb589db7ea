//! Spoken delivery types.

use serde::{Deserialize, Serialize};

/// One piece of a response handed to the audio engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechChunk {
    /// Chunk text including its terminating mark, if any.
    pub text: String,
    pub terminator: Option<char>,
}

/// Where a `speak` call currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "chunk", rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Speaking(usize),
    Interrupted,
}

/// How a `speak` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackOutcome {
    /// Every chunk was handed to the sink.
    Completed { chunks: usize },
    /// The interrupt signal was seen before chunk `played` started.
    Interrupted { played: usize },
}

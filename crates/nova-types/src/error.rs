use thiserror::Error;

/// Errors from routing an utterance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Nothing was said; the caller should simply read the next utterance.
    #[error("empty input")]
    InputEmpty,
}

/// Errors from switching the active local model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelSwitchError {
    #[error("Model '{alias}' not found. Available: {}", .available.join(", "))]
    AliasNotFound {
        alias: String,
        available: Vec<String>,
    },
}

/// Errors from the audio-out primitive.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start speech engine: {0}")]
    Spawn(String),

    #[error("speech engine failed: {0}")]
    Engine(String),
}

/// Errors from opening a URL on the host.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to launch '{url}': {reason}")]
    Failed { url: String, reason: String },
}

/// Errors from an encyclopedia lookup.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("no article found for '{0}'")]
    NotFound(String),

    #[error("lookup failed: {0}")]
    Request(String),
}

/// Errors from the transcription supplier.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcriber failed to start: {0}")]
    Spawn(String),

    #[error("could not understand audio")]
    Unintelligible,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_not_found_lists_aliases_in_order() {
        let err = ModelSwitchError::AliasNotFound {
            alias: "gpt".into(),
            available: vec!["llama".into(), "phi".into(), "coder".into()],
        };
        assert_eq!(
            err.to_string(),
            "Model 'gpt' not found. Available: llama, phi, coder"
        );
    }
}

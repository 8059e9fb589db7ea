use futures_util::future::BoxFuture;

use nova_types::error::TranscriptionError;

/// Turns one spoken utterance into text.
///
/// Front ends fall back to typed input when no transcriber is configured.
pub trait Transcriber: Send + Sync {
    fn listen(&self) -> BoxFuture<'_, Result<String, TranscriptionError>>;
}

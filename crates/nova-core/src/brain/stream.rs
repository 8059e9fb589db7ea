use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};

use nova_types::llm::{Fragment, GenerationOutcome};

/// Lazy sequence of fragments produced by one generation.
///
/// Dropping the stream before it ends abandons the generation; the partial
/// output is still committed to history.
pub struct GenerationStream {
    inner: Pin<Box<dyn Stream<Item = Fragment> + Send>>,
    outcome: Arc<OnceLock<GenerationOutcome>>,
}

impl GenerationStream {
    pub(crate) fn new(
        inner: Pin<Box<dyn Stream<Item = Fragment> + Send>>,
        outcome: Arc<OnceLock<GenerationOutcome>>,
    ) -> Self {
        Self { inner, outcome }
    }

    /// How the generation ended. `None` until the stream has finished.
    pub fn outcome(&self) -> Option<GenerationOutcome> {
        self.outcome.get().copied()
    }

    /// Drain the stream, concatenating every fragment's text.
    pub async fn collect_text(mut self) -> (String, Option<GenerationOutcome>) {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment.text);
        }
        (text, self.outcome())
    }
}

impl Stream for GenerationStream {
    type Item = Fragment;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for GenerationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStream")
            .field("outcome", &self.outcome())
            .finish_non_exhaustive()
    }
}

//! Scoped commit of one generation's turns.

use tokio::sync::OwnedMutexGuard;

use nova_types::chat::TurnRole;

use crate::chat::session::Session;

/// Owns the session lock for one generation and records its turns.
///
/// The user turn is recorded on [`begin`](TurnCommit::begin). The assistant
/// buffer is committed exactly once: by [`finish`](TurnCommit::finish), or on
/// drop if the generation was abandoned.
pub struct TurnCommit {
    session: OwnedMutexGuard<Session>,
    buffer: String,
    committed: bool,
}

impl TurnCommit {
    pub fn begin(mut session: OwnedMutexGuard<Session>, prompt: &str) -> Self {
        session.history.append(TurnRole::User, prompt);
        Self {
            session,
            buffer: String::new(),
            committed: false,
        }
    }

    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Commit the buffer as one assistant turn. Later calls are no-ops.
    pub fn finish(&mut self) {
        if self.committed {
            return;
        }
        self.committed = true;
        let content = std::mem::take(&mut self.buffer);
        self.session.record_response(&content);
        self.session.history.append(TurnRole::Assistant, content);
    }
}

impl Drop for TurnCommit {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!(chars = self.buffer.len(), "generation abandoned, committing partial output");
            self.finish();
        }
    }
}

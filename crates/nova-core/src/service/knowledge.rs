//! Encyclopedia lookups for "who is" / "what is" questions.

use futures_util::future::BoxFuture;

use nova_types::error::KnowledgeError;

/// Short factual summaries of a topic.
pub trait KnowledgeSource: Send + Sync {
    /// A few sentences about `topic`, ready to be spoken.
    fn summary<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Result<String, KnowledgeError>>;
}

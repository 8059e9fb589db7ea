//! Web search used to augment chat prompts.

use futures_util::future::BoxFuture;

/// Supplies a short context block for a prompt.
///
/// Failures are not errors for the caller: an unreachable or empty search
/// simply yields `None` and the prompt goes out unaugmented.
pub trait WebSearch: Send + Sync {
    fn context<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Option<String>>;
}

/// Prepend a search context block to `prompt`.
pub fn augment_prompt(context: &str, prompt: &str) -> String {
    format!("{context}\nUser Query: {prompt}")
}

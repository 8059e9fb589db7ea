//! Wikipedia summaries for "who is" / "what is" questions.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use nova_core::service::knowledge::KnowledgeSource;
use nova_types::config::KnowledgeConfig;
use nova_types::error::KnowledgeError;

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// [`KnowledgeSource`] backed by the Wikipedia REST summary endpoint.
pub struct WikipediaKnowledge {
    client: reqwest::Client,
    endpoint: String,
    sentences: usize,
}

impl WikipediaKnowledge {
    pub fn new(config: &KnowledgeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("nova/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
            sentences: config.sentences.max(1),
        }
    }

    /// Summary URL for `topic`, percent-encoded as a single path segment.
    fn summary_url(&self, topic: &str) -> Result<Url, KnowledgeError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| KnowledgeError::Request(e.to_string()))?;
        let title = topic.trim().replace(' ', "_");
        url.path_segments_mut()
            .map_err(|()| KnowledgeError::Request(format!("invalid endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }

    async fn fetch(&self, topic: &str) -> Result<String, KnowledgeError> {
        let url = self.summary_url(topic)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| KnowledgeError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(KnowledgeError::NotFound(topic.to_string())),
            status if !status.is_success() => {
                return Err(KnowledgeError::Request(format!("HTTP {status}")));
            }
            _ => {}
        }

        let page: PageSummary = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Request(format!("invalid summary: {e}")))?;

        let summary = first_sentences(&page.extract, self.sentences);
        if summary.is_empty() {
            return Err(KnowledgeError::NotFound(topic.to_string()));
        }
        debug!(topic, chars = summary.len(), "knowledge lookup complete");
        Ok(summary)
    }
}

impl KnowledgeSource for WikipediaKnowledge {
    fn summary<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Result<String, KnowledgeError>> {
        Box::pin(self.fetch(topic))
    }
}

/// The first `count` sentences of `text`.
///
/// A sentence ends at `.`, `?` or `!` followed by whitespace or the end of
/// the text, so abbreviations like "3.5" stay intact.
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == count {
                return text[..idx + c.len_utf8()].to_string();
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knowledge() -> WikipediaKnowledge {
        WikipediaKnowledge::new(&KnowledgeConfig::default())
    }

    #[test]
    fn keeps_requested_sentence_count() {
        let text = "Ada Lovelace was a mathematician. She wrote the first program. She died in 1852.";
        assert_eq!(
            first_sentences(text, 2),
            "Ada Lovelace was a mathematician. She wrote the first program."
        );
        assert_eq!(first_sentences(text, 5), text);
    }

    #[test]
    fn decimals_do_not_end_sentences() {
        assert_eq!(
            first_sentences("Python 3.12 was released in 2023. It is fast.", 1),
            "Python 3.12 was released in 2023."
        );
    }

    #[test]
    fn summary_url_encodes_topic() {
        let url = knowledge().summary_url("alan turing").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/alan_turing"
        );

        let url = knowledge().summary_url("c/c++").unwrap();
        assert!(url.as_str().ends_with("/summary/c%2Fc++"));
    }

    #[test]
    fn summary_parses_extract() {
        let page: PageSummary =
            serde_json::from_str(r#"{"title":"Rust","extract":"Rust is a language."}"#).unwrap();
        assert_eq!(page.extract, "Rust is a language.");
    }
}

//! DuckDuckGo Instant Answer search used to augment chat prompts.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;
use tracing::{debug, warn};

use nova_core::service::search::WebSearch;
use nova_types::config::SearchConfig;

/// One search hit reduced to what goes into the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics are either a single hit or a named group of hits.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Hit {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

/// [`WebSearch`] backed by the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(config: &SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
            max_results: config.max_results,
        }
    }

    async fn fetch(&self, query: &str) -> Result<InstantAnswer, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl WebSearch for DuckDuckGoSearch {
    fn context<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            let answer = match self.fetch(query).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, "web search failed, sending prompt unaugmented");
                    return None;
                }
            };
            let hits = collect_hits(answer, self.max_results);
            debug!(query, hits = hits.len(), "web search complete");
            format_context(&hits)
        })
    }
}

fn collect_hits(answer: InstantAnswer, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    if !answer.abstract_text.trim().is_empty() {
        hits.push(SearchHit {
            title: answer.heading,
            body: answer.abstract_text,
        });
    }

    let mut pending: Vec<RelatedTopic> = answer.related_topics.into_iter().rev().collect();
    while let Some(topic) = pending.pop() {
        if hits.len() >= max_results {
            break;
        }
        match topic {
            RelatedTopic::Hit { text } => {
                if let Some(hit) = split_topic_text(&text) {
                    hits.push(hit);
                }
            }
            RelatedTopic::Group { topics } => pending.extend(topics.into_iter().rev()),
        }
    }

    hits.truncate(max_results);
    hits
}

/// Related-topic text reads "Title - description"; a bare text is its own title.
fn split_topic_text(text: &str) -> Option<SearchHit> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (title, body) = text.split_once(" - ").unwrap_or((text, text));
    Some(SearchHit {
        title: title.trim().to_string(),
        body: body.trim().to_string(),
    })
}

/// Render hits as the block prepended to the prompt, or `None` when empty.
pub fn format_context(hits: &[SearchHit]) -> Option<String> {
    if hits.is_empty() {
        return None;
    }
    let mut context = String::from("Web Search Results:\n");
    for hit in hits {
        context.push_str(&format!("- {}: {}\n", hit.title, hit.body));
    }
    Some(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InstantAnswer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn abstract_comes_first_then_related_topics() {
        let answer = parse(
            r#"{
                "Heading": "Rust",
                "AbstractText": "Rust is a systems programming language.",
                "RelatedTopics": [
                    {"Text": "Cargo - The Rust package manager", "FirstURL": "https://duckduckgo.com/Cargo"},
                    {"Name": "See also", "Topics": [
                        {"Text": "Ferris - The Rust mascot"},
                        {"Text": "Clippy - A linter"}
                    ]}
                ]
            }"#,
        );

        let hits = collect_hits(answer, 3);
        let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Rust", "Cargo", "Ferris"]);
        assert_eq!(hits[1].body, "The Rust package manager");
    }

    #[test]
    fn empty_answer_yields_no_context() {
        let hits = collect_hits(parse(r#"{"Heading": "", "AbstractText": ""}"#), 3);
        assert!(hits.is_empty());
        assert_eq!(format_context(&hits), None);
    }

    #[test]
    fn context_block_format() {
        let hits = vec![SearchHit {
            title: "Rust".to_string(),
            body: "A language".to_string(),
        }];
        assert_eq!(
            format_context(&hits).as_deref(),
            Some("Web Search Results:\n- Rust: A language\n")
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_not_an_error() {
        let search = DuckDuckGoSearch::new(&SearchConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/".to_string(),
            max_results: 3,
        });
        assert_eq!(search.context("rust").await, None);
    }
}

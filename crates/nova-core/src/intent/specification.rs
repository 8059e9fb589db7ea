//! Re-entrant specification mode.
//!
//! Once entered, every utterance is a new specification sub-topic until the
//! user says one of the stop phrases.

use super::matching::{collapse, has_any_phrase};

/// Phrases that leave specification mode.
pub const STOP_PHRASES: [&str; 5] = ["stop", "done", "that's it", "that is it", "bas"];

/// What an utterance means while specification mode is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecStep {
    /// Leave the mode.
    Exit,
    /// Nothing usable was heard; ask again and stay in the mode.
    Repeat,
    /// Answer the specifications of this topic.
    Topic(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationMode {
    topic: Option<String>,
}

impl SpecificationMode {
    pub fn enter(&mut self, topic: impl Into<String>) {
        self.topic = Some(topic.into());
    }

    pub fn exit(&mut self) {
        self.topic = None;
    }

    pub fn is_active(&self) -> bool {
        self.topic.is_some()
    }

    /// Current topic, if the mode is active.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Advance the mode with the next utterance.
    pub fn step(&mut self, utterance: &str) -> SpecStep {
        if has_any_phrase(utterance, &STOP_PHRASES) {
            self.exit();
            return SpecStep::Exit;
        }

        let topic = collapse(utterance);
        if topic.is_empty() {
            return SpecStep::Repeat;
        }

        self.topic = Some(topic.clone());
        SpecStep::Topic(topic)
    }
}

/// Prompt sent to the backend for a specification-only answer.
pub fn specification_prompt(topic: &str) -> String {
    format!(
        "Give only the technical specifications of {topic}. \
         Answer as a short list of specifications and nothing else."
    )
}

//! Intent classification results and the registries the router matches against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a classified utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ModeSwitch,
    ReadBack,
    SiteOpen,
    MusicPlay,
    TimeQuery,
    ModelSwitch,
    Specification,
    Lookup,
    Chat,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::ModeSwitch => "mode_switch",
            IntentKind::ReadBack => "read_back",
            IntentKind::SiteOpen => "site_open",
            IntentKind::MusicPlay => "music_play",
            IntentKind::TimeQuery => "time_query",
            IntentKind::ModelSwitch => "model_switch",
            IntentKind::Specification => "specification",
            IntentKind::Lookup => "lookup",
            IntentKind::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// A classified utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// What is left of the utterance once the matched keywords are removed.
    pub payload: String,
    /// The registry key that matched: site key, model alias, or input mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Intent {
    pub fn new(kind: IntentKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// An empty payload selects the category's default action.
    pub fn is_default_action(&self) -> bool {
        self.payload.is_empty()
    }
}

/// A website the assistant knows how to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    /// Substring looked for in the utterance (e.g. "youtube").
    pub key: String,
    /// Display name used in replies.
    pub name: String,
    pub home_url: String,
    /// Search URL template with a `{}` placeholder. Sites without one always
    /// open their home page.
    #[serde(default)]
    pub search_url: Option<String>,
}

impl SiteEntry {
    pub fn new(key: &str, name: &str, home_url: &str, search_url: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            home_url: home_url.to_string(),
            search_url: search_url.map(str::to_string),
        }
    }

    /// Build the search URL for `term`, or `None` if the site has no search.
    pub fn search_for(&self, term: &str) -> Option<String> {
        self.search_url
            .as_ref()
            .map(|template| template.replacen("{}", &term.replace(' ', "+"), 1))
    }
}

/// Short user-facing name for a backend model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAlias {
    pub alias: String,
    pub model: String,
}

impl ModelAlias {
    pub fn new(alias: &str, model: &str) -> Self {
        Self {
            alias: alias.to_string(),
            model: model.to_string(),
        }
    }
}

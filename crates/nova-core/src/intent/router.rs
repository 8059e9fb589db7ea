//! Ordered, first-match-wins intent classification.

use std::sync::Arc;

use tracing::debug;

use nova_types::chat::InputMode;
use nova_types::intent::{Intent, IntentKind};

use super::matching::{collapse, has_any_phrase, has_phrase, strip_phrases};
use super::sites::SiteRegistry;
use crate::llm::backend::ModelAliasTable;

const SPEC_KEYWORDS: [&str; 3] = ["technical specs", "specs", "specifications"];
const SPEC_FILLER: [&str; 2] = ["give", "of"];
const LOOKUP_KEYWORDS: [&str; 3] = ["who is", "what is", "tell me about"];

type Matcher = fn(&IntentRouter, &str) -> Option<Intent>;

struct Rule {
    kind: IntentKind,
    matcher: Matcher,
}

/// Classifies utterances against an ordered rule chain.
///
/// The chain order is part of the contract and is exposed through
/// [`IntentRouter::precedence`]. Chat is the implicit last rule.
pub struct IntentRouter {
    sites: SiteRegistry,
    aliases: Arc<ModelAliasTable>,
    rules: Vec<Rule>,
}

impl IntentRouter {
    pub fn new(sites: SiteRegistry, aliases: Arc<ModelAliasTable>) -> Self {
        let rules = vec![
            Rule { kind: IntentKind::ModeSwitch, matcher: match_mode_switch },
            Rule { kind: IntentKind::ReadBack, matcher: match_read_back },
            Rule { kind: IntentKind::SiteOpen, matcher: match_site_open },
            Rule { kind: IntentKind::MusicPlay, matcher: match_music },
            Rule { kind: IntentKind::TimeQuery, matcher: match_time },
            Rule { kind: IntentKind::ModelSwitch, matcher: match_model_switch },
            Rule { kind: IntentKind::Specification, matcher: match_specification },
            Rule { kind: IntentKind::Lookup, matcher: match_lookup },
        ];
        Self { sites, aliases, rules }
    }

    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }

    /// Rule order, highest priority first, ending with the chat fallback.
    pub fn precedence(&self) -> Vec<IntentKind> {
        self.rules
            .iter()
            .map(|rule| rule.kind)
            .chain(std::iter::once(IntentKind::Chat))
            .collect()
    }

    /// Classify a normalized utterance. Never fails; unmatched text is chat.
    pub fn classify(&self, text: &str) -> Intent {
        let intent = self
            .rules
            .iter()
            .find_map(|rule| (rule.matcher)(self, text))
            .unwrap_or_else(|| Intent::new(IntentKind::Chat, text));
        debug!(kind = %intent.kind, payload = %intent.payload, "classified utterance");
        intent
    }
}

fn match_mode_switch(_: &IntentRouter, text: &str) -> Option<Intent> {
    [InputMode::Voice, InputMode::Text]
        .into_iter()
        .find(|mode| has_phrase(text, &format!("switch to {mode} mode")))
        .map(|mode| Intent::new(IntentKind::ModeSwitch, "").with_target(mode.to_string()))
}

fn match_read_back(_: &IntentRouter, text: &str) -> Option<Intent> {
    has_phrase(text, "read").then(|| {
        Intent::new(IntentKind::ReadBack, collapse(&strip_phrases(text, &["read"])))
    })
}

fn match_site_open(router: &IntentRouter, text: &str) -> Option<Intent> {
    if !has_phrase(text, "open") {
        return None;
    }
    let site = router.sites.first_match(text)?;
    let residual = strip_phrases(text, &["open", "search", "on"]).replace(&site.key, " ");
    Some(Intent::new(IntentKind::SiteOpen, collapse(&residual)).with_target(site.key.clone()))
}

fn match_music(_: &IntentRouter, text: &str) -> Option<Intent> {
    has_phrase(text, "play").then(|| {
        Intent::new(
            IntentKind::MusicPlay,
            collapse(&strip_phrases(text, &["play", "on youtube"])),
        )
    })
}

fn match_time(_: &IntentRouter, text: &str) -> Option<Intent> {
    has_phrase(text, "time").then(|| Intent::new(IntentKind::TimeQuery, ""))
}

fn match_model_switch(router: &IntentRouter, text: &str) -> Option<Intent> {
    if !has_phrase(text, "switch to") {
        return None;
    }
    let alias = router.aliases.find_in(text)?;
    let residual = strip_phrases(text, &["switch to"]).replace(alias, " ");
    Some(Intent::new(IntentKind::ModelSwitch, collapse(&residual)).with_target(alias))
}

fn match_specification(_: &IntentRouter, text: &str) -> Option<Intent> {
    if !has_any_phrase(text, &SPEC_KEYWORDS) {
        return None;
    }
    let mut strip: Vec<&str> = SPEC_KEYWORDS.to_vec();
    strip.extend(SPEC_FILLER);
    let topic = collapse(&strip_phrases(text, &strip));
    if topic.is_empty() {
        return Some(Intent::new(IntentKind::Chat, text));
    }
    Some(Intent::new(IntentKind::Specification, topic))
}

fn match_lookup(_: &IntentRouter, text: &str) -> Option<Intent> {
    if !has_any_phrase(text, &LOOKUP_KEYWORDS) {
        return None;
    }
    let topic = collapse(&strip_phrases(text, &LOOKUP_KEYWORDS));
    if topic.is_empty() {
        return Some(Intent::new(IntentKind::Chat, text));
    }
    Some(Intent::new(IntentKind::Lookup, topic))
}

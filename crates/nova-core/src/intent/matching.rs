//! Whole-word keyword matching over utterance tokens.
//!
//! A keyword phrase matches when its words appear as a contiguous run of
//! utterance tokens, comparing each token with its surrounding punctuation
//! trimmed. "sometimes" therefore never matches "time".

/// Normalize one raw token for comparison.
fn normalize(token: &str) -> String {
    token
        .replace('\u{2019}', "'")
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .trim_matches('\'')
        .to_string()
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(normalize).collect()
}

fn matches_at(tokens: &[String], start: usize, phrase: &[String]) -> bool {
    !phrase.is_empty()
        && start + phrase.len() <= tokens.len()
        && tokens[start..start + phrase.len()] == *phrase
}

/// Whether `phrase` occurs in `text` as whole words.
pub fn has_phrase(text: &str, phrase: &str) -> bool {
    let tokens = words(text);
    let phrase = words(phrase);
    (0..tokens.len()).any(|i| matches_at(&tokens, i, &phrase))
}

/// Whether any of `phrases` occurs in `text` as whole words.
pub fn has_any_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| has_phrase(text, phrase))
}

/// Remove every whole-word occurrence of `phrases`, longest phrase first at
/// each position, keeping the remaining raw tokens.
pub fn strip_phrases(text: &str, phrases: &[&str]) -> String {
    let raw: Vec<&str> = text.split_whitespace().collect();
    let tokens: Vec<String> = raw.iter().map(|t| normalize(t)).collect();

    let mut candidates: Vec<Vec<String>> = phrases.iter().map(|p| words(p)).collect();
    candidates.sort_by_key(|p| std::cmp::Reverse(p.len()));

    let mut kept = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match candidates.iter().find(|p| matches_at(&tokens, i, p)) {
            Some(phrase) => i += phrase.len(),
            None => {
                kept.push(raw[i]);
                i += 1;
            }
        }
    }
    kept.join(" ")
}

/// Collapse whitespace runs and trim sentence punctuation from the ends.
pub fn collapse(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '.' | ',' | '?' | '!' | ';' | ':'))
        .trim()
        .to_string()
}

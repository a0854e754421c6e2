//! Ordered text heuristics that decide how a chat message is answered.
//!
//! Checks run in a fixed order and the first hit wins:
//! API key, incident ID, search keyword, status keyword, fallback.

use std::sync::LazyLock;

use regex::Regex;

static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsk-[A-Za-z0-9_\-]{20,}").expect("valid api key regex"));

static INCIDENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINC\d+\b").expect("valid incident id regex"));

static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:search(?:\s+for)?|find|look\s+(?:for|up)|show\s+me|related\s+to|incidents?\s+(?:about|with|involving))\b(.*)$",
    )
    .expect("valid search regex")
});

static STATUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:status|summary|overview|how\s+many|statistics|stats)\b")
        .expect("valid status regex")
});

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9_\-]*").expect("valid term regex"));

const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "are", "for", "in", "incident", "incidents", "is",
    "issues", "me", "my", "of", "on", "or", "please", "related", "that", "the", "there", "tickets",
    "to", "up", "what", "which", "with",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Message carries an LLM API key.
    ApiKeySetup { key: String },
    /// Message names an incident; the ID is upper-cased.
    IncidentLookup { id: String },
    /// Message asks to search; `terms` are lower-cased and stop-word free.
    IncidentSearch { query: String, terms: Vec<String> },
    StatusSummary,
    FallbackAnalysis,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::ApiKeySetup { .. } => "api-key-setup",
            Intent::IncidentLookup { .. } => "incident-lookup",
            Intent::IncidentSearch { .. } => "incident-search",
            Intent::StatusSummary => "status-summary",
            Intent::FallbackAnalysis => "fallback-analysis",
        }
    }
}

pub fn classify(text: &str) -> Intent {
    if let Some(key) = extract_api_key(text) {
        return Intent::ApiKeySetup { key };
    }

    if let Some(id) = extract_incident_id(text) {
        return Intent::IncidentLookup { id };
    }

    if let Some(caps) = SEARCH_PATTERN.captures(text) {
        let query = caps
            .get(1)
            .map(|m| m.as_str().trim().trim_end_matches(['?', '.', '!']).trim())
            .unwrap_or_default()
            .to_string();
        let terms = search_terms(&query);
        return Intent::IncidentSearch { query, terms };
    }

    if STATUS_PATTERN.is_match(text) {
        return Intent::StatusSummary;
    }

    Intent::FallbackAnalysis
}

pub fn extract_api_key(text: &str) -> Option<String> {
    API_KEY_PATTERN.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_incident_id(text: &str) -> Option<String> {
    INCIDENT_ID_PATTERN
        .find(text)
        .map(|m| m.as_str().to_uppercase())
}

pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for m in TERM_PATTERN.find_iter(query) {
        let term = m.as_str().to_lowercase();
        if term.len() < 2 || STOP_WORDS.contains(&term.as_str()) {
            continue;
        }
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Hides all but the first few characters of a key for logs and replies.
pub fn mask_api_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    format!("{}****", visible)
}

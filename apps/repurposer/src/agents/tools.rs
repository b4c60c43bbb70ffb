//! Lightweight heuristic helpers that enrich the strategy and draft prompts.
//!
//! Both are pure string analysis; they never call the model.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::content::normalize::{first_sentence, normalize_whitespace};

const STOPWORDS: &[&str] = &["the", "and", "for", "with", "this", "that", "from", "you", "your"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicResearch {
    pub topic: String,
    pub keywords: Vec<String>,
    pub angles: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookMap {
    pub keywords: Vec<String>,
    pub hooks: Vec<String>,
    pub notes: String,
}

fn clean_token(word: &str) -> String {
    word.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?'))
        .to_lowercase()
}

/// Breaks a brief into up to 8 sorted keywords (words longer than 3 characters)
/// and up to 3 "practical tips" angles.
pub fn topic_research(topic: &str) -> TopicResearch {
    let cleaned = normalize_whitespace(topic);
    if cleaned.is_empty() {
        return TopicResearch {
            topic: String::new(),
            keywords: vec![],
            angles: vec![],
            notes: "No topic provided.".to_string(),
        };
    }

    let unique: BTreeSet<String> = cleaned
        .split(' ')
        .filter(|w| w.chars().count() > 3)
        .map(clean_token)
        .collect();

    let keywords: Vec<String> = unique.into_iter().take(8).collect();
    let angles = keywords
        .iter()
        .take(3)
        .map(|w| format!("Practical tips about {w}"))
        .collect();

    TopicResearch {
        topic: cleaned,
        keywords,
        angles,
        notes: "Heuristic topic breakdown based on user brief.".to_string(),
    }
}

/// Pulls candidate keywords and hook ideas out of the strategist's notes.
pub fn keyword_and_hook_mapper(strategy_text: &str) -> HookMap {
    let cleaned = normalize_whitespace(strategy_text);
    if cleaned.is_empty() {
        return HookMap {
            keywords: vec![],
            hooks: vec![],
            notes: "Empty strategy text; nothing to extract.".to_string(),
        };
    }

    let keywords: BTreeSet<String> = cleaned
        .split(' ')
        .map(clean_token)
        .filter(|t| t.chars().count() > 3 && !STOPWORDS.contains(&t.as_str()))
        .collect();

    let mut hooks = Vec::new();
    if first_sentence(&cleaned).contains('?') {
        hooks.push("Start with a question to draw the reader in.".to_string());
    }
    if cleaned.to_lowercase().contains("story") {
        hooks.push("Open with a short story-based hook.".to_string());
    }
    hooks.push("Use a concrete scenario your audience relates to.".to_string());
    hooks.push("Highlight a pain point in the first line.".to_string());

    HookMap {
        keywords: keywords.into_iter().take(10).collect(),
        hooks,
        notes: "Heuristic mapper; can be swapped with a smarter tool later.".to_string(),
    }
}

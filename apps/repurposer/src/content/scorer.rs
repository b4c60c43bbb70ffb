//! Deterministic heuristic scoring of one piece of platform content.
//!
//! Dimensions (each 0.0 – 1.0):
//! - clarity, tone_match, length_appropriateness, hook_strength, cta_quality
//! - hashtag_richness (Instagram only)
//!
//! `score` is the mean over the dimensions that are present. Dimensions that do
//! not apply to a platform are absent from the map, never stored as zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::hashtags::count_hashtags;
use crate::content::normalize::{first_sentence, word_count};
use crate::content::platform::{Platform, PlatformRules};
use crate::content::FALLBACK_MARKER;

pub const NO_TEXT_FEEDBACK: &str = "No text to evaluate.";
pub const LENGTH_ADVICE: &str = "Adjust the length to better fit this platform.";
pub const HOOK_ADVICE: &str = "Consider a stronger opening line or hook.";
pub const CTA_ADVICE: &str = "Add a clearer call-to-action.";
pub const HASHTAG_ADVICE: &str = "Add more relevant hashtags to increase reach.";
pub const POSITIVE_FEEDBACK: &str = "Overall, this content is well-structured for the platform.";

/// Instagram captions: short but not too short.
const INSTAGRAM_MIN_WORDS: usize = 10;
const INSTAGRAM_MAX_WORDS: usize = 120;

/// Below this many words a post reads as too thin to be clear.
const SHORT_TEXT_WORDS: usize = 15;

const HOOK_EMOJIS: &[&str] = &["🔥", "✨", "💪", "🚀"];
const HOOK_OPENERS: &[&str] = &["imagine", "what if", "ever felt"];
const CTA_PHRASES: &[&str] = &[
    "share",
    "comment",
    "tell me",
    "let me know",
    "join",
    "reply",
    "dm me",
    "reach out",
    "connect",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Clarity,
    ToneMatch,
    LengthAppropriateness,
    HookStrength,
    CtaQuality,
    HashtagRichness,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Clarity => "clarity",
            Dimension::ToneMatch => "tone_match",
            Dimension::LengthAppropriateness => "length_appropriateness",
            Dimension::HookStrength => "hook_strength",
            Dimension::CtaQuality => "cta_quality",
            Dimension::HashtagRichness => "hashtag_richness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub platform: String,
    pub score: f64,
    pub dimensions: BTreeMap<Dimension, f64>,
    pub summary_feedback: String,
}

/// Scores `text` for the platform named by `platform_id` (case-insensitive).
///
/// `_strategy` is the raw strategist text, accepted for callers that carry it;
/// no heuristic reads it yet, so passing `None` scores identically.
///
/// `score` is the unrounded mean of the present dimensions. Rounding to two
/// decimals happens only where scores are shown or written to the results
/// log, so a custom refinement threshold compares against the exact mean.
pub fn score_content(
    rules: &PlatformRules,
    platform_id: &str,
    text: &str,
    _strategy: Option<&str>,
) -> ScoreResult {
    let platform_name = platform_id.trim().to_lowercase();
    let platform = Platform::parse(&platform_name);
    let text = text.trim();

    if text.is_empty() {
        return ScoreResult {
            platform: platform_name,
            score: 0.0,
            dimensions: BTreeMap::new(),
            summary_feedback: NO_TEXT_FEEDBACK.to_string(),
        };
    }

    let words = word_count(text);

    let mut dimensions = BTreeMap::new();
    dimensions.insert(Dimension::Clarity, clarity(text, words));
    dimensions.insert(Dimension::ToneMatch, 0.8);
    dimensions.insert(
        Dimension::LengthAppropriateness,
        length_appropriateness(rules, platform, words),
    );
    dimensions.insert(Dimension::HookStrength, hook_strength(text));
    dimensions.insert(Dimension::CtaQuality, cta_quality(text));
    if platform == Some(Platform::Instagram) {
        dimensions.insert(Dimension::HashtagRichness, hashtag_richness(text));
    }

    ScoreResult {
        platform: platform_name,
        score: mean_score(&dimensions),
        summary_feedback: build_feedback(&dimensions),
        dimensions,
    }
}

/// Arithmetic mean of the present dimensions; 0.0 for an empty map.
pub fn mean_score(dimensions: &BTreeMap<Dimension, f64>) -> f64 {
    if dimensions.is_empty() {
        return 0.0;
    }
    dimensions.values().sum::<f64>() / dimensions.len() as f64
}

fn clarity(text: &str, words: usize) -> f64 {
    if text.contains(FALLBACK_MARKER) {
        0.3
    } else if words < SHORT_TEXT_WORDS {
        0.6
    } else {
        0.8
    }
}

fn length_appropriateness(rules: &PlatformRules, platform: Option<Platform>, words: usize) -> f64 {
    let (min, max) = match platform {
        Some(p @ (Platform::LinkedIn | Platform::Email)) => {
            let config = rules.get(p);
            (
                config.min_words.unwrap_or(0),
                config.max_words.unwrap_or(usize::MAX),
            )
        }
        Some(Platform::Instagram) => (INSTAGRAM_MIN_WORDS, INSTAGRAM_MAX_WORDS),
        None => return 0.8,
    };

    if words < min {
        0.5
    } else if words > max {
        0.6
    } else {
        0.9
    }
}

fn hook_strength(text: &str) -> f64 {
    let opening = first_sentence(text);
    let mut strength: f64 = 0.7;

    if opening.contains('?') {
        strength = 0.85;
    }
    if HOOK_EMOJIS.iter().any(|e| opening.contains(e)) {
        strength = strength.max(0.8);
    }
    let lower = opening.to_lowercase();
    if HOOK_OPENERS.iter().any(|p| lower.starts_with(p)) {
        strength = strength.max(0.85);
    }
    strength
}

fn cta_quality(text: &str) -> f64 {
    let lower = text.to_lowercase();
    if CTA_PHRASES.iter().any(|p| lower.contains(p)) {
        0.9
    } else {
        0.6
    }
}

fn hashtag_richness(text: &str) -> f64 {
    match count_hashtags(text) {
        0 => 0.4,
        3..=15 => 0.9,
        _ => 0.7,
    }
}

fn build_feedback(dimensions: &BTreeMap<Dimension, f64>) -> String {
    let below = |d: Dimension, threshold: f64| dimensions.get(&d).is_some_and(|&v| v < threshold);

    let mut parts = Vec::new();
    if below(Dimension::LengthAppropriateness, 0.7) {
        parts.push(LENGTH_ADVICE);
    }
    if below(Dimension::HookStrength, 0.75) {
        parts.push(HOOK_ADVICE);
    }
    if below(Dimension::CtaQuality, 0.75) {
        parts.push(CTA_ADVICE);
    }
    // Only present for Instagram.
    if below(Dimension::HashtagRichness, 0.7) {
        parts.push(HASHTAG_ADVICE);
    }

    if parts.is_empty() {
        POSITIVE_FEEDBACK.to_string()
    } else {
        parts.join(" ")
    }
}

//! Platform formatting: applies per-platform length/line limits and hashtag cleanup.
//!
//! Never fails: unknown platforms and empty text produce a result carrying a
//! warning instead of an error.

use serde::{Deserialize, Serialize};

use crate::content::hashtags::hashtag_block;
use crate::content::normalize::normalize_whitespace;
use crate::content::platform::{Platform, PlatformConfig, PlatformRules};

/// Placeholder returned for a known platform when the input text is blank.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "[EMPTY CONTENT] No text was provided to format.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatResult {
    pub platform: String,
    pub formatted_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Instagram only: the caption after line/char limits, without hashtags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Instagram only: deduplicated tags joined by single spaces (may be empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag_block: Option<String>,
}

impl FormatResult {
    fn plain(platform: impl Into<String>, formatted_text: String, warnings: Vec<String>) -> Self {
        Self {
            platform: platform.into(),
            formatted_text,
            warnings,
            caption: None,
            hashtag_block: None,
        }
    }
}

/// Formats `text` for the platform named by `platform_id` (case-insensitive).
/// `hashtags` is only consulted for Instagram.
pub fn format_for_platform<S: AsRef<str>>(
    rules: &PlatformRules,
    platform_id: &str,
    text: &str,
    hashtags: &[S],
) -> FormatResult {
    let Some(platform) = Platform::parse(platform_id) else {
        return FormatResult::plain(
            platform_id.trim().to_lowercase(),
            normalize_whitespace(text),
            vec!["Unknown platform; no specific formatting applied.".to_string()],
        );
    };

    if text.trim().is_empty() {
        return FormatResult::plain(
            platform.as_str(),
            EMPTY_CONTENT_PLACEHOLDER.to_string(),
            vec!["Input text was empty.".to_string()],
        );
    }

    let config = rules.get(platform);
    match platform {
        Platform::LinkedIn | Platform::Email => {
            let (formatted, warnings) = limit_words(config, text);
            FormatResult::plain(platform.as_str(), formatted, warnings)
        }
        Platform::Instagram => format_instagram(config, text, hashtags),
    }
}

/// Word-boundary truncation to `max_words`; texts under `min_words` are only flagged.
fn limit_words(config: &PlatformConfig, text: &str) -> (String, Vec<String>) {
    let normalized = normalize_whitespace(text);
    let words: Vec<&str> = normalized.split(' ').collect();
    let (trimmed_noun, short_noun) = match config.platform {
        Platform::Email => ("email blurb", "Email blurb"),
        _ => ("LinkedIn post", "LinkedIn post"),
    };

    if let Some(max) = config.max_words {
        if words.len() > max {
            return (
                words[..max].join(" "),
                vec![format!("Trimmed {trimmed_noun} to {max} words.")],
            );
        }
    }

    let mut warnings = Vec::new();
    if let Some(min) = config.min_words {
        if words.len() < min {
            warnings.push(format!(
                "{short_noun} is quite short ({} words).",
                words.len()
            ));
        }
    }
    (normalized, warnings)
}

/// Keeps line breaks. Lines beyond `max_lines` are dropped, then the caption is
/// cut at `max_chars` characters, which can split a word.
fn format_instagram<S: AsRef<str>>(
    config: &PlatformConfig,
    text: &str,
    hashtags: &[S],
) -> FormatResult {
    let mut caption = text.trim().to_string();
    let mut warnings = Vec::new();

    if let Some(max_lines) = config.max_lines {
        let lines: Vec<&str> = caption.lines().collect();
        if lines.len() > max_lines {
            warnings.push(format!(
                "Dropped {} lines beyond the {max_lines}-line limit.",
                lines.len() - max_lines
            ));
            caption = lines[..max_lines].join("\n");
        }
    }

    if let Some(max_chars) = config.max_chars {
        if caption.chars().count() > max_chars {
            caption = caption.chars().take(max_chars).collect();
            warnings.push(format!("Truncated caption to {max_chars} characters."));
        }
    }

    let block = hashtag_block(hashtags);
    let formatted_text = if block.is_empty() {
        caption.clone()
    } else {
        format!("{caption}\n\n{block}")
    };

    FormatResult {
        platform: Platform::Instagram.as_str().to_string(),
        formatted_text,
        warnings,
        caption: Some(caption),
        hashtag_block: Some(block),
    }
}

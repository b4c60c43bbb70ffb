use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));

/// Matches the `[Hashtags]` section header the Instagram prompt asks the model for.
static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[hashtags\]:?").expect("valid section regex"));

/// Cleans a raw hashtag list: trims each tag, drops empties, prepends `#` where
/// missing, and removes case-insensitive duplicates. First-seen order and the
/// original casing of the surviving tag are kept.
pub fn normalize_hashtags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for tag in tags {
        let t = tag.as_ref().trim();
        if t.is_empty() {
            continue;
        }
        let t = if t.starts_with('#') {
            t.to_string()
        } else {
            format!("#{t}")
        };
        if seen.insert(t.to_lowercase()) {
            out.push(t);
        }
    }

    out
}

/// Single-space-joined hashtag block, empty when there are no usable tags.
pub fn hashtag_block<S: AsRef<str>>(tags: &[S]) -> String {
    normalize_hashtags(tags).join(" ")
}

/// Number of `#word` tokens in the text.
pub fn count_hashtags(text: &str) -> usize {
    HASHTAG_RE.find_iter(text).count()
}

/// Splits model output into its caption and the raw tags listed under a
/// `[Hashtags]` header. Without a header, the text is returned untouched and no
/// tags are extracted (inline hashtags stay part of the caption).
pub fn split_hashtag_section(text: &str) -> (String, Vec<String>) {
    let Some(header) = SECTION_RE.find(text) else {
        return (text.to_string(), Vec::new());
    };

    let caption = text[..header.start()].trim_end().to_string();
    let tags = text[header.end()..]
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    (caption, tags)
}

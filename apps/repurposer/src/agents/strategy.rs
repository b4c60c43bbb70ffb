use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIENCE: &str = "early-career or general";
pub const DEFAULT_TONE: &str = "honest, practical, encouraging";

/// Strategist output carried through the pipeline. The raw model text is kept
/// verbatim; `key_points` is filled from numbered or bulleted lines when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub raw: String,
    pub key_points: Vec<String>,
    pub audience: String,
    pub tone: String,
}

impl Strategy {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key_points = extract_list_items(&raw);
        Self {
            raw,
            key_points,
            audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
        }
    }
}

/// Lines that start with `-`, `*`, `•` or `N.` / `N)`, stripped of the marker.
fn extract_list_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = if let Some(r) = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .or_else(|| line.strip_prefix("• "))
            {
                r
            } else {
                let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
                if digits == 0 {
                    return None;
                }
                line[digits..]
                    .strip_prefix('.')
                    .or_else(|| line[digits..].strip_prefix(')'))?
            };
            let rest = rest.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .collect()
}

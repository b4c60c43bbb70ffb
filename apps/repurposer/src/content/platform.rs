//! Platform identifiers and the per-platform constraint table.
//!
//! `PlatformRules` is built once at startup (see `Config::from_env`) and passed
//! by reference into the formatter and scorer. Tests construct their own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fixed content-distribution channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Instagram,
    Email,
}

impl Platform {
    /// Generation and reporting order.
    pub const ALL: [Platform; 3] = [Platform::LinkedIn, Platform::Instagram, Platform::Email];

    /// Case-insensitive lookup. Returns `None` for identifiers outside the fixed set.
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "linkedin" => Some(Platform::LinkedIn),
            "instagram" => Some(Platform::Instagram),
            "email" => Some(Platform::Email),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Instagram => "instagram",
            Platform::Email => "email",
        }
    }

    /// Human-facing name used in prompts and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::Email => "Email",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint record for a single platform. Unused limits are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub platform: Platform,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
    pub max_chars: Option<usize>,
    pub max_lines: Option<usize>,
}

impl PlatformConfig {
    pub fn word_limited(platform: Platform, min_words: usize, max_words: usize) -> Self {
        Self {
            platform,
            min_words: Some(min_words),
            max_words: Some(max_words),
            max_chars: None,
            max_lines: None,
        }
    }

    pub fn caption_limited(platform: Platform, max_chars: usize, max_lines: usize) -> Self {
        Self {
            platform,
            min_words: None,
            max_words: None,
            max_chars: Some(max_chars),
            max_lines: Some(max_lines),
        }
    }
}

/// The full constraint table for every supported platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRules {
    pub linkedin: PlatformConfig,
    pub instagram: PlatformConfig,
    pub email: PlatformConfig,
}

impl Default for PlatformRules {
    fn default() -> Self {
        Self {
            linkedin: PlatformConfig::word_limited(Platform::LinkedIn, 80, 220),
            // 2200 is Instagram's hard caption limit
            instagram: PlatformConfig::caption_limited(Platform::Instagram, 2200, 10),
            email: PlatformConfig::word_limited(Platform::Email, 40, 160),
        }
    }
}

impl PlatformRules {
    pub fn get(&self, platform: Platform) -> &PlatformConfig {
        match platform {
            Platform::LinkedIn => &self.linkedin,
            Platform::Instagram => &self.instagram,
            Platform::Email => &self.email,
        }
    }
}

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::content::platform::{Platform, PlatformConfig, PlatformRules};
use crate::content::refinement::DEFAULT_REFINEMENT_THRESHOLD;

pub const DEFAULT_RESULTS_PATH: &str = "evaluation/test_results.csv";

/// Application configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Only the `run` command needs it; see `require_api_key`.
    pub anthropic_api_key: Option<String>,
    pub results_path: PathBuf,
    pub refinement_threshold: f64,
    pub platform_rules: PlatformRules,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let refinement_threshold: f64 =
            parse_or(&lookup, "REFINEMENT_THRESHOLD", DEFAULT_REFINEMENT_THRESHOLD)?;
        if !(0.0..=1.0).contains(&refinement_threshold) {
            bail!("REFINEMENT_THRESHOLD must be between 0.0 and 1.0, got {refinement_threshold}");
        }

        let defaults = PlatformRules::default();
        let word_limits = |platform: Platform, prefix: &str| -> Result<PlatformConfig> {
            let base = defaults.get(platform);
            let min = parse_or(&lookup, &format!("{prefix}_MIN_WORDS"), base.min_words.unwrap_or(0))?;
            let max = parse_or(&lookup, &format!("{prefix}_MAX_WORDS"), base.max_words.unwrap_or(usize::MAX))?;
            if min > max {
                bail!("{prefix}_MIN_WORDS ({min}) exceeds {prefix}_MAX_WORDS ({max})");
            }
            Ok(PlatformConfig::word_limited(platform, min, max))
        };

        let platform_rules = PlatformRules {
            linkedin: word_limits(Platform::LinkedIn, "LINKEDIN")?,
            instagram: PlatformConfig::caption_limited(
                Platform::Instagram,
                parse_or(&lookup, "INSTAGRAM_MAX_CHARS", defaults.instagram.max_chars.unwrap_or(2200))?,
                parse_or(&lookup, "INSTAGRAM_MAX_LINES", defaults.instagram.max_lines.unwrap_or(10))?,
            ),
            email: word_limits(Platform::Email, "EMAIL")?,
        };

        Ok(Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            results_path: lookup("REPURPOSER_RESULTS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_PATH)),
            refinement_threshold,
            platform_rules,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

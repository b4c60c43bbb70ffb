// Agent layer: role definitions, prompt templates, and the safe execution wrapper.
// Agents only see `TextModel`; HTTP lives in `llm_client`.

pub mod prompts;
pub mod strategy;
pub mod tools;

use tracing::warn;

use crate::content::FALLBACK_MARKER;
use crate::llm_client::TextModel;

use prompts::{CONTROLLER_SYSTEM, DRAFT_WRITER_SYSTEM, STRATEGIST_SYSTEM, STYLIST_SYSTEM};

/// A named role with a fixed system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub role: &'static str,
    pub system_prompt: &'static str,
}

impl Agent {
    /// Outlines how the other agents should collaborate. Produces no content.
    pub fn controller() -> Self {
        Self {
            role: "Content Director",
            system_prompt: CONTROLLER_SYSTEM,
        }
    }

    pub fn strategist() -> Self {
        Self {
            role: "Content Strategist",
            system_prompt: STRATEGIST_SYSTEM,
        }
    }

    pub fn draft_writer() -> Self {
        Self {
            role: "Master Draft Writer",
            system_prompt: DRAFT_WRITER_SYSTEM,
        }
    }

    /// Writes the platform variants and their rewrites.
    pub fn stylist() -> Self {
        Self {
            role: "Platform Stylist",
            system_prompt: STYLIST_SYSTEM,
        }
    }
}

/// Deterministic text returned in place of content when the model is unavailable.
pub fn fallback_text(reason: impl std::fmt::Display) -> String {
    format!("{FALLBACK_MARKER} Unable to generate content due to: {reason}")
}

pub fn is_fallback(text: &str) -> bool {
    text.trim_start().starts_with(FALLBACK_MARKER)
}

/// Runs one agent turn. The model owns retries; once it gives up, this returns
/// the fallback text instead of an error so the pipeline can keep going.
pub async fn run_agent(model: &dyn TextModel, agent: &Agent, prompt: &str) -> String {
    match model.complete(agent.system_prompt, prompt).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Agent '{}' returning fallback text: {e}", agent.role);
            fallback_text(e)
        }
    }
}

//! Content repurposing pipeline: drives the agents and the heuristic core.
//!
//! Flow: controller plan → strategy → base draft → 3 platform variants →
//!       score → one rewrite for low scorers → format for presentation.
//!
//! Model calls are strictly sequential. A failed call never aborts the run:
//! `run_agent` substitutes fallback text, which the scorer then penalises.

use serde::Serialize;
use tracing::{info, warn};

use crate::agents::prompts::{
    CONTROLLER_PROMPT_TEMPLATE, DRAFT_PROMPT_TEMPLATE, EMAIL_PROMPT_TEMPLATE,
    INSTAGRAM_PROMPT_TEMPLATE, LINKEDIN_PROMPT_TEMPLATE, REFINEMENT_PROMPT_TEMPLATE,
    STRATEGY_PROMPT_TEMPLATE,
};
use crate::agents::strategy::Strategy;
use crate::agents::tools::{keyword_and_hook_mapper, topic_research, HookMap, TopicResearch};
use crate::agents::{is_fallback, run_agent, Agent};
use crate::config::Config;
use crate::content::formatter::{format_for_platform, FormatResult};
use crate::content::hashtags::split_hashtag_section;
use crate::content::platform::{Platform, PlatformRules};
use crate::content::refinement::{needs_refinement, RefinementRecord};
use crate::content::scorer::{score_content, ScoreResult};
use crate::errors::AppError;
use crate::llm_client::prompts::{quoted, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::TextModel;

/// The slice of configuration the pipeline reads.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub platform_rules: PlatformRules,
    pub refinement_threshold: f64,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            platform_rules: config.platform_rules.clone(),
            refinement_threshold: config.refinement_threshold,
        }
    }
}

/// Final state of one platform variant.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformOutcome {
    pub platform: Platform,
    /// Model output after the optional rewrite.
    pub text: String,
    /// Score of `text`.
    pub score: ScoreResult,
    pub refinement: RefinementRecord,
    /// `text` after platform formatting, for presentation only.
    pub formatted: FormatResult,
}

/// Every intermediate and final output of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    pub brief: String,
    pub controller_plan: String,
    pub topic_research: TopicResearch,
    pub strategy: Strategy,
    pub hook_map: HookMap,
    pub base_draft: String,
    /// One entry per platform, in `Platform::ALL` order.
    pub outcomes: Vec<PlatformOutcome>,
}

impl RunState {
    pub fn outcome(&self, platform: Platform) -> Option<&PlatformOutcome> {
        self.outcomes.iter().find(|o| o.platform == platform)
    }

    pub fn score_of(&self, platform: Platform) -> Option<f64> {
        self.outcome(platform).map(|o| o.score.score)
    }

    pub fn refined(&self) -> impl Iterator<Item = &PlatformOutcome> {
        self.outcomes.iter().filter(|o| o.refinement.was_refined())
    }
}

/// Runs the full pipeline for one brief.
pub async fn run_content_repurposer(
    model: &dyn TextModel,
    settings: &PipelineSettings,
    brief: &str,
) -> Result<RunState, AppError> {
    let brief = brief.trim();
    if brief.is_empty() {
        return Err(AppError::Validation(
            "Brief is empty. Provide 1–3 sentences about your idea, audience, and tone.".to_string(),
        ));
    }

    // Step 1: Controller plan (informational only)
    info!("Requesting controller plan");
    let controller_plan = run_agent(model, &Agent::controller(), &build_controller_prompt(brief)).await;

    // Step 2: Strategy
    let research = topic_research(brief);
    info!("Requesting strategy ({} topic keywords)", research.keywords.len());
    let strategy_raw =
        run_agent(model, &Agent::strategist(), &build_strategy_prompt(brief, &research)).await;
    let strategy = Strategy::from_raw(strategy_raw);

    // Step 3: Neutral base draft
    let hook_map = keyword_and_hook_mapper(&strategy.raw);
    info!("Requesting base draft");
    let mut base_draft = run_agent(
        model,
        &Agent::draft_writer(),
        &build_draft_prompt(brief, &strategy, &hook_map),
    )
    .await;
    if base_draft.is_empty() || is_fallback(&base_draft) {
        warn!("Base draft is empty or a fallback; using the brief as the base draft");
        base_draft = format!("This draft is based on the user brief:\n\n{brief}");
    }

    // Step 4: Platform variants + initial scores
    let stylist = Agent::stylist();
    let mut variants = Vec::with_capacity(Platform::ALL.len());
    for platform in Platform::ALL {
        info!("Requesting {} variant", platform.label());
        let text = run_agent(model, &stylist, &build_variant_prompt(platform, &base_draft)).await;
        let score = score_content(
            &settings.platform_rules,
            platform.as_str(),
            &text,
            Some(strategy.raw.as_str()),
        );
        info!("{} score: {:.2}", platform.label(), score.score);
        variants.push((platform, text, score));
    }

    // Step 5: One rewrite per low-scoring platform, then format
    let mut outcomes = Vec::with_capacity(variants.len());
    for (platform, text, score) in variants {
        let (text, score, refinement) =
            maybe_refine(model, settings, &strategy, platform, text, score).await;
        let formatted = format_variant(&settings.platform_rules, platform, &text);
        for warning in &formatted.warnings {
            warn!("{} formatting: {warning}", platform.label());
        }
        outcomes.push(PlatformOutcome {
            platform,
            text,
            score,
            refinement,
            formatted,
        });
    }

    Ok(RunState {
        brief: brief.to_string(),
        controller_plan,
        topic_research: research,
        strategy,
        hook_map,
        base_draft,
        outcomes,
    })
}

/// Asks the stylist for exactly one rewrite when the score is under the
/// threshold. A fallback or empty rewrite leaves the original in place.
async fn maybe_refine(
    model: &dyn TextModel,
    settings: &PipelineSettings,
    strategy: &Strategy,
    platform: Platform,
    text: String,
    score: ScoreResult,
) -> (String, ScoreResult, RefinementRecord) {
    if !needs_refinement(Some(score.score), settings.refinement_threshold) {
        return (text, score, RefinementRecord::default());
    }

    info!(
        "{} scored {:.2} (< {:.2}); requesting one rewrite",
        platform.label(),
        score.score,
        settings.refinement_threshold
    );
    let prompt = build_refinement_prompt(platform, &text, &score.summary_feedback);
    let improved = run_agent(model, &Agent::stylist(), &prompt).await;

    if improved.is_empty() || is_fallback(&improved) {
        warn!(
            "Refinement for {} produced fallback/empty text; keeping original",
            platform.label()
        );
        return (text, score, RefinementRecord::default());
    }

    let new_score = score_content(
        &settings.platform_rules,
        platform.as_str(),
        &improved,
        Some(strategy.raw.as_str()),
    );
    let record = RefinementRecord::between(Some(score.score), Some(new_score.score));
    info!(
        "{} refined: {:.2} → {:.2} (Δ={:.2})",
        platform.label(),
        score.score,
        new_score.score,
        record.delta
    );
    (improved, new_score, record)
}

/// Instagram output may carry a `[Hashtags]` section; it is split off and
/// passed through hashtag normalization.
fn format_variant(rules: &PlatformRules, platform: Platform, text: &str) -> FormatResult {
    match platform {
        Platform::Instagram => {
            let (caption, tags) = split_hashtag_section(text);
            format_for_platform(rules, platform.as_str(), &caption, tags.as_slice())
        }
        _ => format_for_platform::<&str>(rules, platform.as_str(), text, &[]),
    }
}

fn build_controller_prompt(brief: &str) -> String {
    CONTROLLER_PROMPT_TEMPLATE.replace("{brief}", &quoted(brief))
}

fn build_strategy_prompt(brief: &str, research: &TopicResearch) -> String {
    let or_none = |items: &[String]| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    };
    STRATEGY_PROMPT_TEMPLATE
        .replace("{brief}", &quoted(brief))
        .replace("{keywords}", &or_none(research.keywords.as_slice()))
        .replace("{angles}", &or_none(research.angles.as_slice()))
}

fn build_draft_prompt(brief: &str, strategy: &Strategy, hooks: &HookMap) -> String {
    let hook_lines = hooks
        .hooks
        .iter()
        .map(|h| format!("- {h}"))
        .collect::<Vec<_>>()
        .join("\n");
    DRAFT_PROMPT_TEMPLATE
        .replace("{brief}", &quoted(brief))
        .replace("{strategy}", &quoted(&strategy.raw))
        .replace("{hooks}", &hook_lines)
        .replace("{plain_output_instruction}", PLAIN_OUTPUT_INSTRUCTION)
}

fn build_variant_prompt(platform: Platform, base_draft: &str) -> String {
    let template = match platform {
        Platform::LinkedIn => LINKEDIN_PROMPT_TEMPLATE,
        Platform::Instagram => INSTAGRAM_PROMPT_TEMPLATE,
        Platform::Email => EMAIL_PROMPT_TEMPLATE,
    };
    template
        .replace("{base_draft}", &quoted(base_draft))
        .replace("{plain_output_instruction}", PLAIN_OUTPUT_INSTRUCTION)
}

fn build_refinement_prompt(platform: Platform, content: &str, feedback: &str) -> String {
    REFINEMENT_PROMPT_TEMPLATE
        .replace("{platform}", platform.as_str())
        .replace("{content}", &quoted(content))
        .replace("{feedback}", &quoted(feedback))
        .replace("{plain_output_instruction}", PLAIN_OUTPUT_INSTRUCTION)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

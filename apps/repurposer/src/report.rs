// Plain-text rendering of a run and of the results summary for stdout.

use std::fmt::Write;

use crate::pipeline::RunState;
use crate::results::PlatformSummary;

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "=== {title} ===");
    let _ = writeln!(out, "{}\n", body.trim());
}

pub fn render_run(state: &RunState) -> String {
    let mut out = String::new();
    section(&mut out, "CONTROLLER PLAN", &state.controller_plan);
    section(&mut out, "BASE DRAFT (neutral)", &state.base_draft);

    for outcome in &state.outcomes {
        let title = format!("{} (formatted)", outcome.platform.label().to_uppercase());
        section(&mut out, &title, &outcome.formatted.formatted_text);
    }

    let _ = writeln!(out, "=== QUALITY REPORT ===\n");
    for outcome in &state.outcomes {
        let _ = writeln!(out, "[{}]", outcome.platform.label().to_uppercase());
        let _ = writeln!(out, "Score: {:.2}", outcome.score.score);
        for (dimension, value) in &outcome.score.dimensions {
            let _ = writeln!(out, "  {dimension}: {value:.2}");
        }
        let _ = writeln!(out, "Summary: {}\n", outcome.score.summary_feedback);
    }

    let refined: Vec<_> = state.refined().collect();
    if !refined.is_empty() {
        let _ = writeln!(out, "=== SELF-IMPROVEMENT REFINEMENTS ===");
        for outcome in refined {
            let r = &outcome.refinement;
            if let (Some(old), Some(new)) = (r.old, r.new) {
                let _ = writeln!(
                    out,
                    "[REFINEMENT] {} improved from {old:.2} → {new:.2} (Δ={:.2}).",
                    outcome.platform.label(),
                    r.delta
                );
            }
        }
        let _ = writeln!(out, "====================================\n");
    }

    out
}

pub fn render_summary(total_runs: usize, summary: &[PlatformSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Runs recorded: {total_runs}");
    for s in summary {
        let fmt = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10} runs={:<3} mean={} min={} max={}",
            s.platform.label(),
            s.runs,
            fmt(s.mean),
            fmt(s.min),
            fmt(s.max)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::strategy::Strategy;
    use crate::agents::tools::{keyword_and_hook_mapper, topic_research};
    use crate::content::formatter::format_for_platform;
    use crate::content::platform::{Platform, PlatformRules};
    use crate::content::refinement::RefinementRecord;
    use crate::content::scorer::score_content;
    use crate::pipeline::PlatformOutcome;
    use crate::results::{summarize, ResultRow};

    fn outcome(platform: Platform, text: &str, refinement: RefinementRecord) -> PlatformOutcome {
        let rules = PlatformRules::default();
        PlatformOutcome {
            platform,
            text: text.to_string(),
            score: score_content(&rules, platform.as_str(), text, None),
            refinement,
            formatted: format_for_platform::<&str>(&rules, platform.as_str(), text, &[]),
        }
    }

    fn state() -> RunState {
        RunState {
            brief: "Focus tips.".to_string(),
            controller_plan: "1. Plan".to_string(),
            topic_research: topic_research("Focus tips."),
            strategy: Strategy::from_raw("notes"),
            hook_map: keyword_and_hook_mapper("notes"),
            base_draft: "Draft body.".to_string(),
            outcomes: vec![
                outcome(
                    Platform::LinkedIn,
                    "Tell me more?",
                    RefinementRecord::between(Some(0.64), Some(0.85)),
                ),
                outcome(Platform::Instagram, "Nice day #a", RefinementRecord::default()),
                outcome(Platform::Email, "Hi.", RefinementRecord::default()),
            ],
        }
    }

    #[test]
    fn test_render_run_lists_sections_in_order() {
        let text = render_run(&state());
        let plan = text.find("=== CONTROLLER PLAN ===").unwrap();
        let draft = text.find("=== BASE DRAFT (neutral) ===").unwrap();
        let report = text.find("=== QUALITY REPORT ===").unwrap();
        assert!(plan < draft && draft < report);
        assert!(text.contains("=== LINKEDIN (formatted) ==="));
        assert!(text.contains("[INSTAGRAM]"));
        assert!(text.contains("  hashtag_richness: 0.70"));
    }

    #[test]
    fn test_render_run_reports_refinements() {
        let text = render_run(&state());
        assert!(text.contains("[REFINEMENT] LinkedIn improved from 0.64 → 0.85 (Δ=0.21)."));
        assert!(!text.contains("[REFINEMENT] Email"));
    }

    #[test]
    fn test_render_summary() {
        let rows = vec![ResultRow {
            test_case: 1,
            linkedin: Some(0.85),
            instagram: None,
            email: Some(0.6),
            timestamp: "t".to_string(),
        }];
        let text = render_summary(rows.len(), &summarize(&rows));
        assert!(text.starts_with("Runs recorded: 1\n"));
        assert!(text.contains("mean=0.85"));
        assert!(text.contains("mean=-"));
    }
}

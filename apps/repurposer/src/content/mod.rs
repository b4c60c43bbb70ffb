// Heuristic core: whitespace normalization, per-platform formatting, quality
// scoring and the refinement decision. Pure functions only; no I/O, no LLM calls.

pub mod formatter;
pub mod hashtags;
pub mod normalize;
pub mod platform;
pub mod refinement;
pub mod scorer;

/// Literal tag the generation layer embeds when it could not produce real content.
pub const FALLBACK_MARKER: &str = "[FALLBACK]";

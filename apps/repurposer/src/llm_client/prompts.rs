// Cross-cutting prompt fragments shared by every agent prompt.
// Agent-specific templates live in agents/prompts.rs.

/// Appended to every user prompt so the reply can be used as-is.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "\
    Respond with the requested content only. \
    Do NOT add a preamble, a title line, or closing remarks about what you wrote. \
    Do NOT wrap the content in markdown code fences.";

/// Fences a user-supplied or model-produced block inside a prompt.
pub fn quoted(text: &str) -> String {
    format!("\"\"\"{}\"\"\"", text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_trims_and_wraps() {
        assert_eq!(quoted("  hi there \n"), "\"\"\"hi there\"\"\"");
    }
}

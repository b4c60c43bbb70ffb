/// Collapses every run of whitespace (spaces, tabs, newlines) into a single space
/// and trims both ends. Empty or whitespace-only input yields an empty string.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The first sentence: everything up to the first `.`, `!` or `?` that is
/// followed by whitespace. The whole text when there is no such break.
pub fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return &text[..i + c.len_utf8()];
                }
            }
        }
    }
    text
}

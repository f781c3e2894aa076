// Text preparation shared by the embedding inputs and the prompts.

/// Collapses every run of whitespace to a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Normalizes then truncates.
pub fn prepare(text: &str, max_chars: usize) -> String {
    let normalized = normalize_whitespace(text);
    truncate_chars(&normalized, max_chars).trim_end().to_string()
}

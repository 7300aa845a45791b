//! Term normalization shared by the index and the query tokenizer.
//!
//! Both sides must agree byte-for-byte, otherwise a query word never finds
//! its postings list.

/// Normalize a single word: lowercase it and drop ASCII punctuation.
///
/// Returns an empty string when nothing is left (e.g. `"--"`); callers skip
/// those.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collapse runs of whitespace into single spaces, trim, and lowercase.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

//! Whitespace normalisation for example record values.

const COMMENT_SIGIL: char = '#';

/// Normalise a morpheme or gloss alignment line.
///
/// Tokens are split on any whitespace, tokens starting with `#` are treated
/// as annotation comments and dropped, and the survivors are joined with a
/// single tab. Absent input, blank input and input consisting only of
/// comments all yield `None`, so callers never see an empty string.
///
/// # Examples
/// ```
/// use dictionaria_core::sfm::normalize_alignment;
///
/// assert_eq!(
///     normalize_alignment(Some("a-  be #note  ko")),
///     Some("a-\tbe\tko".to_owned())
/// );
/// assert_eq!(normalize_alignment(Some("  ")), None);
/// assert_eq!(normalize_alignment(None), None);
/// ```
#[must_use]
pub fn normalize_alignment(line: Option<&str>) -> Option<String> {
    let tokens: Vec<&str> = line?
        .split_whitespace()
        .filter(|token| !token.starts_with(COMMENT_SIGIL))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join("\t"))
    }
}

/// Collapse internal whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

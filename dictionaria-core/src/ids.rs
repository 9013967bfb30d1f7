//! Deterministic identifiers and slugs.
//!
//! Every persisted object carries a string id computed from stable inputs
//! (submission id, row id, content), so re-running a load yields the same
//! ids.

use sha2::{Digest, Sha256};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Byte inserted between hashed fields so that `("ab", "c")` and
/// `("a", "bc")` never collide.
const FIELD_SEPARATOR: u8 = 0x1f;

/// Number of digest bytes kept for content ids.
const CONTENT_ID_BYTES: usize = 16;

/// Reduce `value` to lowercase alphanumerics with diacritics removed.
///
/// # Examples
/// ```
/// use dictionaria_core::ids::slugify;
///
/// assert_eq!(slugify("Élan, vital!"), "elanvital");
/// assert_eq!(slugify("  "), "");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Content hash identifying an example without an explicit reference.
///
/// SHA-256 over the slugs of `text` and `translation` joined by a unit
/// separator, truncated to 128 bits and hex encoded.
#[must_use]
pub fn content_id(text: &str, translation: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slugify(text).as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(slugify(translation).as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest.iter().take(CONTENT_ID_BYTES).copied().collect::<Vec<u8>>())
}

/// Prefix a submission-local id with the submission id.
#[must_use]
pub fn scoped_id(submission: &str, local: &str) -> String {
    format!("{submission}-{local}")
}

/// Id of the value set materialised for the `index`-th atomic meaning.
#[must_use]
pub fn value_set_id(meaning_id: &str, index: usize) -> String {
    format!("{meaning_id}-{index}")
}

/// Normalise an entry id used as a cross-reference target.
///
/// # Examples
/// ```
/// use dictionaria_core::ids::normalise_target_id;
///
/// assert_eq!(normalise_target_id(" Ab 12 "), "ab12");
/// ```
#[must_use]
pub fn normalise_target_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Contributor id built from a free-form personal name.
///
/// The final whitespace separated token is taken as the family name and
/// the remaining tokens as given names; a trailing `Last, First` form is
/// also understood. The id is the slug of family name followed by given
/// names.
///
/// # Examples
/// ```
/// use dictionaria_core::ids::contributor_id;
///
/// assert_eq!(contributor_id("Iren Hartmann"), "hartmanniren");
/// assert_eq!(contributor_id("Hartmann, Iren"), "hartmanniren");
/// ```
#[must_use]
pub fn contributor_id(name: &str) -> String {
    if let Some((last, first)) = name.split_once(',') {
        return slugify(&format!("{last}{first}"));
    }
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, given)) => slugify(&format!("{last}{}", given.concat())),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn content_id_is_stable() {
        let id = content_id("A beiko.", "The child.");
        assert_eq!(id, content_id("A beiko.", "The child."));
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn content_id_separates_fields() {
        assert_ne!(content_id("ab", "c"), content_id("a", "bc"));
        assert_ne!(content_id("abc", ""), content_id("", "abc"));
    }

    #[rstest]
    #[case("Ñandú", "nandu")]
    #[case("dog-house 2", "doghouse2")]
    #[case("ПРИВЕТ", "привет")]
    fn slugify_folds_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[rstest]
    fn scoped_ids_join_with_dash() {
        assert_eq!(scoped_id("daakaka", "12"), "daakaka-12");
        assert_eq!(value_set_id("daakaka-s3", 0), "daakaka-s3-0");
    }

    #[rstest]
    #[case("Jane Mary Doe", "doejanemary")]
    #[case("Doe", "doe")]
    #[case("", "")]
    fn contributor_ids(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(contributor_id(name), expected);
    }
}

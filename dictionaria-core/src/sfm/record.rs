use std::{borrow::Cow, fmt};

use log::debug;

use super::{Marker, RecordError, collapse_whitespace, normalize_alignment};
use crate::ids::content_id;

/// Separator placed between accumulated values of the same marker.
pub const MULTI_VALUE_SEPARATOR: &str = " ; ";

/// How a record obtains its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Only an explicit `\ref` value identifies the record.
    #[default]
    Explicit,
    /// Records without `\ref` receive a content hash of their text and
    /// translation when they are read.
    ContentHash,
}

/// One SFM example with a named slot per recognised marker.
///
/// Unrecognised markers, and repeats of markers that only hold a single
/// value, are kept in an ordered overflow list so that nothing read from a
/// source file is silently dropped.
///
/// # Examples
/// ```
/// use dictionaria_core::sfm::{ExampleRecord, Marker};
///
/// let mut record = ExampleRecord::new();
/// record.set(Marker::Tx, "A beiko.");
/// record.set(Marker::Ft, "The child.");
/// record.set(Marker::Lemma, "beiko");
/// record.set(Marker::Lemma, "a");
///
/// assert_eq!(record.lemma(), Some("beiko ; a"));
/// assert_eq!(record.id().len(), 32);
/// assert!(record.reference().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleRecord {
    reference: Option<String>,
    lemma: Option<String>,
    corpus_ref: Option<String>,
    text: Option<String>,
    morphemes: Option<String>,
    gloss: Option<String>,
    translation: Option<String>,
    other_text: Option<String>,
    other_translation: Option<String>,
    sound_file: Option<String>,
    overflow: Vec<(String, String)>,
}

impl ExampleRecord {
    /// The marker holding the record's identity.
    pub const IDENTITY: Marker = Marker::Ref;

    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn slot(&self, marker: Marker) -> &Option<String> {
        match marker {
            Marker::Ref => &self.reference,
            Marker::Lemma => &self.lemma,
            Marker::Rf => &self.corpus_ref,
            Marker::Tx => &self.text,
            Marker::Mb => &self.morphemes,
            Marker::Gl => &self.gloss,
            Marker::Ft => &self.translation,
            Marker::Ot => &self.other_text,
            Marker::Ota => &self.other_translation,
            Marker::Sf => &self.sound_file,
        }
    }

    const fn slot_mut(&mut self, marker: Marker) -> &mut Option<String> {
        match marker {
            Marker::Ref => &mut self.reference,
            Marker::Lemma => &mut self.lemma,
            Marker::Rf => &mut self.corpus_ref,
            Marker::Tx => &mut self.text,
            Marker::Mb => &mut self.morphemes,
            Marker::Gl => &mut self.gloss,
            Marker::Ft => &mut self.translation,
            Marker::Ot => &mut self.other_text,
            Marker::Ota => &mut self.other_translation,
            Marker::Sf => &mut self.sound_file,
        }
    }

    /// Value of `marker`, or `None` when the marker is absent or empty.
    #[must_use]
    pub fn get(&self, marker: Marker) -> Option<&str> {
        self.slot(marker)
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    /// Set `marker` to `value`.
    ///
    /// Accumulating markers append to an existing value using
    /// [`MULTI_VALUE_SEPARATOR`]; every other marker is replaced.
    pub fn set(&mut self, marker: Marker, value: impl Into<String>) {
        let value = value.into();
        let slot = self.slot_mut(marker);
        if marker.is_accumulating()
            && let Some(existing) = slot.as_mut()
            && !existing.is_empty()
        {
            if !value.is_empty() {
                existing.push_str(MULTI_VALUE_SEPARATOR);
                existing.push_str(&value);
            }
            return;
        }
        *slot = Some(value);
    }

    /// Set a marker given by its code.
    ///
    /// # Errors
    /// Returns [`RecordError::UnknownMarker`] when `code` is not one of the
    /// recognised markers; the record is left untouched.
    pub fn set_code(&mut self, code: &str, value: impl Into<String>) -> Result<(), RecordError> {
        let marker: Marker = code.parse()?;
        self.set(marker, value);
        Ok(())
    }

    /// Append a raw `(code, value)` pair as read from a source file.
    ///
    /// Recognised markers fill their slot the first time they are seen and
    /// accumulate where the marker allows it. Unknown codes and repeats of
    /// single-valued markers land in the overflow list under the raw code.
    pub fn push(&mut self, code: &str, value: impl Into<String>) {
        let value = value.into();
        match code.parse::<Marker>() {
            Ok(marker) if marker.is_accumulating() || self.slot(marker).is_none() => {
                self.set(marker, value);
            }
            Ok(marker) => {
                debug!("keeping repeated {marker} value in overflow");
                self.overflow.push((marker.code().to_owned(), value));
            }
            Err(_) => {
                debug!("keeping unrecognised marker \\{code} in overflow");
                self.overflow.push((code.to_owned(), value));
            }
        }
    }

    /// Unrecognised or repeated markers in the order they were read.
    #[must_use]
    pub fn overflow(&self) -> &[(String, String)] {
        &self.overflow
    }

    /// First overflow value recorded under `code`.
    #[must_use]
    pub fn overflow_value(&self, code: &str) -> Option<&str> {
        self.overflow
            .iter()
            .find(|(key, _)| key == code)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the record carries no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overflow.is_empty() && Marker::ALL.into_iter().all(|m| self.slot(m).is_none())
    }

    /// Explicit `\ref` value.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.get(Marker::Ref)
    }

    /// Accumulated `\lemma` values.
    #[must_use]
    pub fn lemma(&self) -> Option<&str> {
        self.get(Marker::Lemma)
    }

    /// Reference into the source corpus (`\rf`).
    #[must_use]
    pub fn corpus_ref(&self) -> Option<&str> {
        self.get(Marker::Rf)
    }

    /// Vernacular text (`\tx`).
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.get(Marker::Tx)
    }

    /// Free translation (`\ft`).
    #[must_use]
    pub fn translation(&self) -> Option<&str> {
        self.get(Marker::Ft)
    }

    /// Tab separated morpheme breaks.
    #[must_use]
    pub fn morphemes(&self) -> Option<String> {
        normalize_alignment(self.get(Marker::Mb))
    }

    /// Tab separated glosses.
    #[must_use]
    pub fn gloss(&self) -> Option<String> {
        normalize_alignment(self.get(Marker::Gl))
    }

    /// The record's identifier without modifying the record.
    ///
    /// Returns the explicit reference when present and otherwise the
    /// content hash that [`ExampleRecord::id`] would insert.
    #[must_use]
    pub fn identity(&self) -> Cow<'_, str> {
        self.reference().map_or_else(
            || Cow::Owned(self.content_id()),
            Cow::Borrowed,
        )
    }

    /// The record's identifier, inserting a content hash as `\ref` when no
    /// explicit reference exists.
    ///
    /// Repeated calls return the same value.
    pub fn id(&mut self) -> &str {
        if self.reference().is_none() {
            self.reference = Some(self.content_id());
        }
        self.reference.as_deref().unwrap_or_default()
    }

    /// Apply an identifier policy to a freshly read record.
    pub fn apply_policy(&mut self, policy: IdPolicy) {
        if policy == IdPolicy::ContentHash {
            self.id();
        }
    }

    /// Id derived for a record without reference from its text and
    /// translation.
    #[must_use]
    pub fn derive_content_id(text: &str, translation: &str) -> String {
        content_id(text, translation)
    }

    fn content_id(&self) -> String {
        Self::derive_content_id(
            self.text().unwrap_or_default(),
            self.translation().unwrap_or_default(),
        )
    }
}

/// Canonical text form: one line per recognised marker in declared order.
impl fmt::Display for ExampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, marker) in Marker::ALL.into_iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            let value = if marker.is_alignment() {
                normalize_alignment(self.get(marker))
            } else {
                self.get(marker)
                    .map(collapse_whitespace)
                    .filter(|value| !value.is_empty())
            };
            match value {
                Some(value) => write!(f, "{marker} {value}")?,
                None => write!(f, "{marker}")?,
            }
        }
        Ok(())
    }
}

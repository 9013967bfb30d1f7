//! Persistence boundary for loaded dictionaries.
//!
//! The `DictionaryStore` trait is the only way the ingestion pipeline
//! writes data. Implementations own their transaction handling: each call
//! either persists everything it was given or nothing.

use crate::{ConceptVocabulary, Dictionary, SubmissionGraph};

/// Write access to the relational dictionary store.
///
/// # Examples
///
/// ```rust
/// use dictionaria_core::{ConceptVocabulary, Dictionary, DictionaryStore, SubmissionGraph};
///
/// #[derive(Default)]
/// struct CountingStore {
///     submissions: usize,
/// }
///
/// impl DictionaryStore for CountingStore {
///     type Error = std::convert::Infallible;
///
///     fn persist_vocabulary(&mut self, _: &ConceptVocabulary) -> Result<(), Self::Error> {
///         Ok(())
///     }
///
///     fn persist_submission(
///         &mut self,
///         _: &Dictionary,
///         _: &SubmissionGraph,
///     ) -> Result<(), Self::Error> {
///         self.submissions += 1;
///         Ok(())
///     }
/// }
///
/// let mut store = CountingStore::default();
/// store.persist_vocabulary(&ConceptVocabulary::default()).unwrap();
/// assert_eq!(store.submissions, 0);
/// ```
pub trait DictionaryStore {
    /// Error raised when a write fails; the failed call leaves no trace.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the concept vocabulary in one transaction.
    fn persist_vocabulary(&mut self, vocabulary: &ConceptVocabulary) -> Result<(), Self::Error>;

    /// Persist one submission's dictionary and object graph in one
    /// transaction.
    fn persist_submission(
        &mut self,
        dictionary: &Dictionary,
        graph: &SubmissionGraph,
    ) -> Result<(), Self::Error>;
}

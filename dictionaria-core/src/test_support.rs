//! Test-only, in-memory `DictionaryStore` used by unit and behaviour tests.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::{ConceptVocabulary, Dictionary, DictionaryStore, SubmissionGraph};

/// Error returned by [`MemoryStore`] for submissions it was told to reject.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("memory store rejected submission {0}")]
pub struct MemoryStoreError(pub String);

/// In-memory store that keeps whatever it is given.
///
/// Submissions listed via [`MemoryStore::failing_on`] are rejected, which
/// lets tests exercise per-submission rollback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vocabulary: Option<ConceptVocabulary>,
    submissions: BTreeMap<String, (Dictionary, SubmissionGraph)>,
    failing: BTreeSet<String>,
}

impl MemoryStore {
    /// Create a store that rejects the listed submission ids.
    pub fn failing_on<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The persisted vocabulary, if any.
    #[must_use]
    pub const fn vocabulary(&self) -> Option<&ConceptVocabulary> {
        self.vocabulary.as_ref()
    }

    /// The persisted graph of a submission.
    #[must_use]
    pub fn graph(&self, id: &str) -> Option<&SubmissionGraph> {
        self.submissions.get(id).map(|(_, graph)| graph)
    }

    /// The persisted dictionary of a submission.
    #[must_use]
    pub fn dictionary(&self, id: &str) -> Option<&Dictionary> {
        self.submissions.get(id).map(|(dictionary, _)| dictionary)
    }

    /// Ids of persisted submissions in order.
    pub fn submission_ids(&self) -> impl Iterator<Item = &str> {
        self.submissions.keys().map(String::as_str)
    }
}

impl DictionaryStore for MemoryStore {
    type Error = MemoryStoreError;

    fn persist_vocabulary(&mut self, vocabulary: &ConceptVocabulary) -> Result<(), Self::Error> {
        self.vocabulary = Some(vocabulary.clone());
        Ok(())
    }

    fn persist_submission(
        &mut self,
        dictionary: &Dictionary,
        graph: &SubmissionGraph,
    ) -> Result<(), Self::Error> {
        if self.failing.contains(&dictionary.id) {
            return Err(MemoryStoreError(dictionary.id.clone()));
        }
        self.submissions
            .insert(dictionary.id.clone(), (dictionary.clone(), graph.clone()));
        Ok(())
    }
}

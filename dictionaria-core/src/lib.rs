//! Core domain types for Dictionaria ingestion.
//!
//! The crate holds everything that does not touch the filesystem or a
//! database: SFM example records and their normalisation, deterministic
//! ids, meaning splitting and concept resolution, the lexicon object graph
//! and the [`DictionaryStore`] persistence boundary.
#![forbid(unsafe_code)]

pub mod ids;
pub mod lexicon;
pub mod meaning;
pub mod sfm;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use lexicon::{
    Contributor, Counterpart, CrossReference, Dictionary, Language, Meaning, MediaKind, MediaRef,
    MetadataPair, Sentence, SubmissionGraph, ValueSet, Word,
};
pub use meaning::{
    Concept, ConceptMatch, ConceptVocabulary, ConceptVocabularyBuilder, MatchSource,
    MeaningResolver, ResolvedMeaning, VocabularyError, has_comparison_meaning, split_meanings,
};
pub use sfm::{ExampleRecord, IdPolicy, Marker, RecordError, normalize_alignment};
pub use store::DictionaryStore;

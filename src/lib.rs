//! Facade crate for Dictionaria submission ingestion.
//!
//! This crate re-exports the core domain types and, behind the `ingest`
//! feature, the readers, loader, SQLite store and batch runner.

#![forbid(unsafe_code)]

pub use dictionaria_core::{
    Concept, ConceptVocabulary, Counterpart, CrossReference, Dictionary, DictionaryStore,
    ExampleRecord, IdPolicy, Language, Marker, Meaning, MeaningResolver, RecordError, Sentence,
    SubmissionGraph, ValueSet, Word, normalize_alignment, split_meanings,
};

#[cfg(feature = "ingest")]
pub use dictionaria_data::{
    BatchError, BatchOptions, BatchReport, CorpusIndex, SfmSchema, SqliteDictionaryStore,
    Submission, load_submission, run_batch,
};

//! Ingestion of Dictionaria submissions.
//!
//! Responsibilities:
//! - Read SFM example files, CSV entry and sense tables, concept lists and
//!   submission metadata from disk.
//! - Turn one submission into a [`SubmissionGraph`](dictionaria_core::SubmissionGraph).
//! - Persist vocabularies and submissions into SQLite.
//! - Run a whole batch of submissions with per-submission failure isolation.
//!
//! Boundaries:
//! - Domain rules (ids, normalisation, meaning resolution) live in
//!   `dictionaria-core`.
//! - Everything here runs on a single thread; one submission is loaded to
//!   completion before the next begins.
#![forbid(unsafe_code)]

pub mod batch;
pub mod corpus;
pub mod loader;
pub mod sfm;
pub mod store;
pub mod submission;
pub mod tabular;
pub mod vocabulary;

#[cfg(test)]
mod test_support;

pub use batch::{
    ALL_SUBMISSIONS, BatchError, BatchOptions, BatchReport, SubmissionFailure,
    SubmissionLoadError, SubmissionSummary, run_batch,
};
pub use corpus::CorpusIndex;
pub use loader::{LoadContext, LoadError, LoadIssue, LoadOutcome, load_submission};
pub use sfm::{
    EntrySeparator, SfmReadError, SfmSchema, parse_records, read_sfm_dir, read_sfm_file,
};
pub use store::{PersistError, SqliteDictionaryStore, StoreSchemaError};
pub use submission::{Submission, SubmissionError, discover_submissions};
pub use tabular::{EntryTable, SenseTable, TabularError};
pub use vocabulary::{VocabularyLoadError, load_vocabulary};

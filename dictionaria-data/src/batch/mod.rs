//! Batch loading of every submission into a store.
//!
//! The vocabulary is loaded and persisted first; a failure there stops the
//! run. Submissions are then loaded one at a time in directory-name order.
//! A submission that fails is reported and skipped; the next one is loaded
//! as usual.

use std::error::Error as StdError;

use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{ConceptVocabulary, DictionaryStore, MeaningResolver};
use log::{error, info, warn};
use thiserror::Error;

use crate::{
    corpus::CorpusIndex,
    loader::{LoadContext, LoadError, LoadIssue, load_submission},
    submission::{Submission, SubmissionError, discover_submissions},
    vocabulary::{VocabularyLoadError, load_vocabulary},
};

/// Value of [`BatchOptions::only`] that selects every submission.
pub const ALL_SUBMISSIONS: &str = "all";

/// What a batch run loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Directory holding one directory per submission.
    pub submissions_dir: Utf8PathBuf,
    /// Directory holding the concept vocabulary; `None` skips concepts.
    pub concepts_dir: Option<Utf8PathBuf>,
    /// Load only the submission with this id.
    pub only: Option<String>,
}

impl BatchOptions {
    /// Whether the submission `id` is part of this run.
    #[must_use]
    pub fn selects(&self, id: &str) -> bool {
        match self.only.as_deref() {
            None | Some(ALL_SUBMISSIONS) => true,
            Some(only) => only == id,
        }
    }
}

/// Counts for a submission that loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSummary {
    /// Submission id.
    pub id: String,
    /// Number of words stored.
    pub words: usize,
    /// Number of meanings stored.
    pub meanings: usize,
    /// Number of example sentences stored.
    pub sentences: usize,
    /// Links skipped while loading.
    pub issues: Vec<LoadIssue>,
}

/// Why one submission could not be loaded.
#[derive(Debug, Error)]
pub enum SubmissionLoadError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to persist submission")]
    Persist {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// A submission that failed.
#[derive(Debug)]
pub struct SubmissionFailure {
    /// Submission id.
    pub id: String,
    /// What went wrong.
    pub error: SubmissionLoadError,
}

/// End-of-run diagnostics.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of concepts persisted.
    pub concepts: usize,
    /// Submissions loaded, in load order.
    pub loaded: Vec<SubmissionSummary>,
    /// Submissions that failed, in load order.
    pub failed: Vec<SubmissionFailure>,
}

impl BatchReport {
    /// Whether any submission failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Errors that stop a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to load the concept vocabulary")]
    Vocabulary(#[from] VocabularyLoadError),
    #[error("failed to persist the concept vocabulary")]
    PersistVocabulary {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to list submissions")]
    Discover(#[source] SubmissionError),
    #[error("no submission matches {id:?}")]
    UnknownSubmission { id: String },
}

/// Load the vocabulary and the selected submissions into `store`.
///
/// # Errors
/// Returns [`BatchError`] when the vocabulary cannot be loaded or stored,
/// when the submissions directory cannot be listed, or when a requested
/// submission does not exist. Individual submission failures are part of
/// the returned report instead.
pub fn run_batch<S: DictionaryStore>(
    store: &mut S,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::default();
    let vocabulary = match &options.concepts_dir {
        Some(dir) => {
            info!("loading concepts ...");
            let vocabulary = load_vocabulary(dir)?;
            store
                .persist_vocabulary(&vocabulary)
                .map_err(|source| BatchError::PersistVocabulary {
                    source: Box::new(source),
                })?;
            info!("... done");
            vocabulary
        }
        None => ConceptVocabulary::default(),
    };
    report.concepts = vocabulary.len();

    let dirs = discover_submissions(&options.submissions_dir).map_err(BatchError::Discover)?;
    let mut selected = 0;
    for dir in dirs {
        let id = dir.file_name().unwrap_or(dir.as_str()).to_owned();
        if !options.selects(&id) {
            continue;
        }
        selected += 1;
        info!("loading {id} ...");
        match load_one(store, &vocabulary, &dir) {
            Ok(summary) => {
                for issue in &summary.issues {
                    warn!("{id}: {issue}");
                }
                info!("... done");
                report.loaded.push(summary);
            }
            Err(err) => {
                error!("{id}: {err}");
                report.failed.push(SubmissionFailure { id, error: err });
            }
        }
    }

    if selected == 0
        && let Some(only) = options.only.as_deref()
        && only != ALL_SUBMISSIONS
    {
        return Err(BatchError::UnknownSubmission { id: only.to_owned() });
    }
    Ok(report)
}

fn load_one<S: DictionaryStore>(
    store: &mut S,
    vocabulary: &ConceptVocabulary,
    dir: &Utf8Path,
) -> Result<SubmissionSummary, SubmissionLoadError> {
    let submission = Submission::open(dir)?;
    let dictionary = submission.dictionary()?;
    let corpus = CorpusIndex::new(submission.read_examples()?);
    let entries = submission.read_entries()?;
    let senses = submission.read_senses()?;

    let context = LoadContext {
        submission_id: submission.id(),
        language_id: &dictionary.language.id,
        resolver: MeaningResolver::new(vocabulary),
        corpus: &corpus,
        labels: &submission.metadata().properties.labels,
    };
    let outcome = load_submission(&context, &entries, &senses)?;
    store
        .persist_submission(&dictionary, &outcome.graph)
        .map_err(|source| SubmissionLoadError::Persist {
            source: Box::new(source),
        })?;

    Ok(SubmissionSummary {
        id: submission.id().to_owned(),
        words: outcome.graph.words().len(),
        meanings: outcome.graph.meanings().len(),
        sentences: outcome.graph.sentences().len(),
        issues: outcome.issues,
    })
}

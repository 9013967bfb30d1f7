//! Error types emitted by the Dictionaria CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use dictionaria_data::{BatchError, PersistError};
use thiserror::Error;

/// Errors emitted by the Dictionaria CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input directory does not exist.
    #[error("{field} path {path:?} does not exist or is not a directory")]
    MissingSourceDir {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The database path exists but is a directory.
    #[error("database path {path:?} is a directory")]
    DatabaseIsDirectory { path: Utf8PathBuf },
    /// Opening or preparing the SQLite database failed.
    #[error("failed to open database {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: PersistError,
    },
    /// The batch run stopped before loading submissions.
    #[error("batch load failed: {0}")]
    Batch(#[from] BatchError),
    /// Writing the run summary failed.
    #[error("failed to write load summary: {0}")]
    WriteSummary(#[source] std::io::Error),
    /// At least one submission could not be loaded.
    #[error("{failed} of {total} submissions failed to load")]
    SubmissionsFailed { failed: usize, total: usize },
}

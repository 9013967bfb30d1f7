//! Command-line interface for loading Dictionaria submissions.
#![forbid(unsafe_code)]

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use dictionaria_data::{
    ALL_SUBMISSIONS, BatchOptions, BatchReport, SqliteDictionaryStore, run_batch,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

mod error;

pub use error::CliError;

const ARG_SUBMISSIONS_DIR: &str = "submissions-dir";
const ARG_CONCEPTS_DIR: &str = "concepts-dir";
const ARG_DATABASE: &str = "database";
const ARG_DICT: &str = "dict";
const ARG_NO_CONCEPTS: &str = "no-concepts";
const ENV_SUBMISSIONS_DIR: &str = "DICTIONARIA_CMDS_LOAD_SUBMISSIONS_DIR";
const ENV_DATABASE: &str = "DICTIONARIA_CMDS_LOAD_DATABASE";

/// Run the Dictionaria CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, when
/// the batch cannot run, or when any submission failed to load.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Load(args) => {
            let config = args.into_config()?;
            config.validate_sources()?;
            let report = run_load(&config)?;
            write_summary(&mut io::stdout().lock(), &report).map_err(CliError::WriteSummary)?;
            ensure_all_loaded(&report)?;
        }
    }
    Ok(())
}

fn run_load(config: &LoadConfig) -> Result<BatchReport, CliError> {
    let mut store =
        SqliteDictionaryStore::open(&config.database).map_err(|source| CliError::OpenStore {
            path: config.database.clone(),
            source,
        })?;
    info!("writing to {}", config.database);
    Ok(run_batch(&mut store, &config.batch_options())?)
}

fn write_summary(out: &mut impl Write, report: &BatchReport) -> io::Result<()> {
    writeln!(out, "concepts: {}", report.concepts)?;
    for summary in &report.loaded {
        writeln!(
            out,
            "{}: {} words, {} meanings, {} sentences, {} skipped links",
            summary.id,
            summary.words,
            summary.meanings,
            summary.sentences,
            summary.issues.len()
        )?;
    }
    for failure in &report.failed {
        writeln!(out, "{}: failed: {}", failure.id, failure.error)?;
    }
    Ok(())
}

fn ensure_all_loaded(report: &BatchReport) -> Result<(), CliError> {
    if report.has_failures() {
        return Err(CliError::SubmissionsFailed {
            failed: report.failed.len(),
            total: report.failed.len() + report.loaded.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "dictionaria",
    about = "Load Dictionaria submissions into a SQLite database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the concept list and dictionary submissions.
    Load(LoadArgs),
}

/// CLI arguments for the `load` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the concept list and every submission found under the \
                 submissions directory into a SQLite database. Paths can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Load dictionary submissions"
)]
#[ortho_config(prefix = "DICTIONARIA")]
struct LoadArgs {
    /// Directory holding one directory per submission.
    #[arg(long = ARG_SUBMISSIONS_DIR, value_name = "dir")]
    #[serde(default)]
    submissions_dir: Option<Utf8PathBuf>,
    /// Directory holding `concepts.csv` and `alt_labels.csv`.
    #[arg(long = ARG_CONCEPTS_DIR, value_name = "dir")]
    #[serde(default)]
    concepts_dir: Option<Utf8PathBuf>,
    /// SQLite database to write; created when missing.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    database: Option<Utf8PathBuf>,
    /// Load only this submission (`all` loads every submission).
    #[arg(long = ARG_DICT, value_name = "id")]
    #[serde(default)]
    dict: Option<String>,
    /// Skip loading the concept list.
    #[arg(long = ARG_NO_CONCEPTS)]
    #[serde(default)]
    no_concepts: bool,
}

impl LoadArgs {
    fn into_config(self) -> Result<LoadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoadConfig::try_from(merged)
    }
}

/// Resolved `load` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadConfig {
    submissions_dir: Utf8PathBuf,
    concepts_dir: Option<Utf8PathBuf>,
    database: Utf8PathBuf,
    only: Option<String>,
}

impl LoadConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_dir(&self.submissions_dir, ARG_SUBMISSIONS_DIR)?;
        if let Some(dir) = &self.concepts_dir {
            Self::require_dir(dir, ARG_CONCEPTS_DIR)?;
        }
        match dictionaria_fs::dir_is_dir(&self.database) {
            Ok(false) => Ok(()),
            Ok(true) => Err(CliError::DatabaseIsDirectory {
                path: self.database.clone(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_DATABASE,
                path: self.database.clone(),
                source,
            }),
        }
    }

    fn require_dir(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match dictionaria_fs::dir_is_dir(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceDir {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            submissions_dir: self.submissions_dir.clone(),
            concepts_dir: self.concepts_dir.clone(),
            only: self.only.clone(),
        }
    }
}

impl TryFrom<LoadArgs> for LoadConfig {
    type Error = CliError;

    fn try_from(args: LoadArgs) -> Result<Self, Self::Error> {
        let submissions_dir = args.submissions_dir.ok_or(CliError::MissingArgument {
            field: ARG_SUBMISSIONS_DIR,
            env: ENV_SUBMISSIONS_DIR,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        let concepts_dir = if args.no_concepts {
            None
        } else {
            args.concepts_dir
        };
        let only = args.dict.filter(|id| id != ALL_SUBMISSIONS);
        Ok(Self {
            submissions_dir,
            concepts_dir,
            database,
            only,
        })
    }
}

#[cfg(test)]
mod tests;

//! Discovery and metadata of dictionary submissions.
//!
//! A submission is a directory holding `md.json`, an entry table, a sense
//! table and optionally example sentences:
//!
//! ```text
//! <id>/md.json
//! <id>/entries.csv | entries.tsv
//! <id>/senses.csv  | senses.tsv
//! <id>/examples.sfm          (Toolbox examples, optional)
//! <id>/corpus/*.eaf.sfm      (ELAN corpus exports, optional)
//! <id>/intro.md              (dictionary description, optional)
//! ```

use std::{collections::BTreeMap, io};

use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{Contributor, Dictionary, ExampleRecord, Language, ids::contributor_id};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    corpus::CORPUS_SUFFIX,
    sfm::{SfmReadError, SfmSchema, read_sfm_dir, read_sfm_file},
    tabular::{EntryTable, SenseTable, TabularError},
};

/// Metadata file marking a directory as a submission.
pub const METADATA_FILE: &str = "md.json";
/// Toolbox example file.
pub const EXAMPLES_FILE: &str = "examples.sfm";
/// Directory of ELAN corpus exports.
pub const CORPUS_DIR: &str = "corpus";
/// Dictionary description.
pub const INTRO_FILE: &str = "intro.md";

const TABLE_EXTENSIONS: [&str; 2] = ["csv", "tsv"];

/// Errors raised while opening a submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to access {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed submission metadata in {path}")]
    Metadata {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("submission {dir} has no {table} table")]
    MissingTable {
        dir: Utf8PathBuf,
        table: &'static str,
    },
    #[error("invalid publication date {value:?} in {path}")]
    InvalidDate { path: Utf8PathBuf, value: String },
    #[error(transparent)]
    Table(#[from] TabularError),
    #[error(transparent)]
    Examples(#[from] SfmReadError),
}

/// The `language` block of `md.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageMetadata {
    /// Glottocode of the language.
    pub glottocode: String,
    /// Language name.
    pub name: String,
}

/// The `properties` block of `md.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmissionProperties {
    /// Dictionary title.
    pub title: Option<String>,
    /// Entry columns displayed as custom fields.
    pub custom_fields: Vec<String>,
    /// Display labels for entry columns.
    pub labels: BTreeMap<String, String>,
}

/// Contents of `md.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionMetadata {
    /// Described language.
    pub language: LanguageMetadata,
    /// Authors in citation order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publication year or date.
    #[serde(default)]
    pub date_published: Option<serde_json::Value>,
    /// Presentation properties.
    #[serde(default)]
    pub properties: SubmissionProperties,
}

/// Normalise a publication date to `YYYY-MM-DD`.
///
/// A bare year becomes the first of January; empty values mean the date is
/// unknown.
///
/// # Examples
/// ```
/// use dictionaria_data::submission::normalise_date;
///
/// assert_eq!(normalise_date("2017").as_deref(), Some("2017-01-01"));
/// assert_eq!(normalise_date("2017-05-03").as_deref(), Some("2017-05-03"));
/// assert_eq!(normalise_date(" "), None);
/// ```
#[must_use]
pub fn normalise_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains('-') {
        Some(value.to_owned())
    } else {
        Some(format!("{value}-01-01"))
    }
}

fn valid_date(date: &str) -> bool {
    let parts: Vec<&str> = date.split('-').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// One submission directory with its parsed metadata.
#[derive(Debug, Clone)]
pub struct Submission {
    id: String,
    dir: Utf8PathBuf,
    metadata: SubmissionMetadata,
    description: Option<String>,
}

impl Submission {
    /// Open the submission stored in `dir`; its id is the directory name.
    pub fn open(dir: &Utf8Path) -> Result<Self, SubmissionError> {
        let id = dir.file_name().unwrap_or(dir.as_str()).to_owned();
        let md_path = dir.join(METADATA_FILE);
        let raw = read(&md_path)?;
        let metadata: SubmissionMetadata =
            serde_json::from_str(&raw).map_err(|source| SubmissionError::Metadata {
                path: md_path.clone(),
                source,
            })?;
        let intro = dir.join(INTRO_FILE);
        let description = if is_file(&intro)? {
            Some(read(&intro)?).filter(|text| !text.trim().is_empty())
        } else {
            None
        };
        Ok(Self {
            id,
            dir: dir.to_path_buf(),
            metadata,
            description,
        })
    }

    /// Submission id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Submission directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Parsed `md.json`.
    #[must_use]
    pub const fn metadata(&self) -> &SubmissionMetadata {
        &self.metadata
    }

    /// Publication date as `YYYY-MM-DD`, if given.
    pub fn published(&self) -> Result<Option<String>, SubmissionError> {
        let raw = match &self.metadata.date_published {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(serde_json::Value::String(value)) => value.clone(),
            Some(other) => other.to_string(),
        };
        match normalise_date(&raw) {
            Some(date) if !valid_date(&date) => Err(SubmissionError::InvalidDate {
                path: self.dir.join(METADATA_FILE),
                value: raw,
            }),
            date => Ok(date),
        }
    }

    /// The dictionary record described by the metadata.
    pub fn dictionary(&self) -> Result<Dictionary, SubmissionError> {
        let language = &self.metadata.language;
        let properties = &self.metadata.properties;
        Ok(Dictionary {
            id: self.id.clone(),
            name: properties
                .title
                .clone()
                .unwrap_or_else(|| format!("{} Dictionary", language.name)),
            description: self.description.clone(),
            language: Language {
                id: language.glottocode.clone(),
                name: language.name.clone(),
            },
            published: self.published()?,
            contributors: self
                .metadata
                .authors
                .iter()
                .map(|name| Contributor {
                    id: contributor_id(name),
                    name: name.clone(),
                })
                .collect(),
            custom_fields: properties.custom_fields.clone(),
        })
    }

    /// Path of the entry table.
    pub fn entries_path(&self) -> Result<Utf8PathBuf, SubmissionError> {
        self.table_path("entries")
    }

    /// Path of the sense table.
    pub fn senses_path(&self) -> Result<Utf8PathBuf, SubmissionError> {
        self.table_path("senses")
    }

    fn table_path(&self, table: &'static str) -> Result<Utf8PathBuf, SubmissionError> {
        for extension in TABLE_EXTENSIONS {
            let path = self.dir.join(format!("{table}.{extension}"));
            if is_file(&path)? {
                return Ok(path);
            }
        }
        Err(SubmissionError::MissingTable {
            dir: self.dir.clone(),
            table,
        })
    }

    /// Read the entry table.
    pub fn read_entries(&self) -> Result<EntryTable, SubmissionError> {
        Ok(EntryTable::read(&self.entries_path()?)?)
    }

    /// Read the sense table.
    pub fn read_senses(&self) -> Result<SenseTable, SubmissionError> {
        Ok(SenseTable::read(&self.senses_path()?)?)
    }

    /// Read Toolbox examples followed by corpus examples.
    pub fn read_examples(&self) -> Result<Vec<ExampleRecord>, SubmissionError> {
        let mut records = Vec::new();
        let examples = self.dir.join(EXAMPLES_FILE);
        if is_file(&examples)? {
            records.extend(read_sfm_file(&examples, &SfmSchema::toolbox())?);
        }
        let corpus = self.dir.join(CORPUS_DIR);
        if is_dir(&corpus)? {
            records.extend(read_sfm_dir(
                &corpus,
                CORPUS_SUFFIX,
                &SfmSchema::elan_export(),
            )?);
        }
        Ok(records)
    }
}

/// Directories under `root` that contain `md.json`, in name order.
pub fn discover_submissions(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, SubmissionError> {
    let entries = dictionaria_fs::list_dir(root).map_err(|source| SubmissionError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let mut dirs = Vec::new();
    for entry in entries.into_iter().filter(|entry| entry.is_dir) {
        if is_file(&entry.path.join(METADATA_FILE))? {
            dirs.push(entry.path);
        }
    }
    Ok(dirs)
}

fn read(path: &Utf8Path) -> Result<String, SubmissionError> {
    dictionaria_fs::read_to_string(path).map_err(|source| SubmissionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_file(path: &Utf8Path) -> Result<bool, SubmissionError> {
    dictionaria_fs::file_is_file(path).map_err(|source| SubmissionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_dir(path: &Utf8Path) -> Result<bool, SubmissionError> {
    dictionaria_fs::dir_is_dir(path).map_err(|source| SubmissionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//! Reading SFM (Standard Format Marker) files into example records.
//!
//! A file is a sequence of `\marker value` lines. Records are split either
//! on blank lines or at a separator marker, depending on the schema. Blocks
//! made only of Toolbox header markers (`\_sh`, `\_DateStamp...`) are
//! skipped. Lines that do not start with a backslash continue the previous
//! field.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{ExampleRecord, IdPolicy};
use log::debug;
use thiserror::Error;

/// Where one record ends and the next begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySeparator {
    /// Records are separated by one or more blank lines.
    BlankLine,
    /// Every occurrence of this raw marker opens a new record.
    Marker(String),
}

impl EntrySeparator {
    /// Separator opening a record at the raw marker `code`.
    #[must_use]
    pub fn marker(code: impl Into<String>) -> Self {
        Self::Marker(code.into())
    }

    fn opens_record(&self, code: &str) -> bool {
        matches!(self, Self::Marker(separator) if separator == code)
    }
}

/// Describes how the files of one corpus type are laid out.
///
/// # Examples
/// ```
/// use dictionaria_data::sfm::{SfmSchema, parse_records};
///
/// let schema = SfmSchema::elan_export();
/// let records = parse_records(
///     "\\utterance_id Bei.001\n\\utterance A beiko.\n\\rp_gloss DET child\n",
///     &schema,
/// );
/// assert_eq!(records[0].reference(), Some("Bei.001"));
/// assert_eq!(records[0].gloss().as_deref(), Some("DET\tchild"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfmSchema {
    entry_separator: EntrySeparator,
    renames: Vec<(String, String)>,
    id_policy: IdPolicy,
}

impl SfmSchema {
    /// Schema splitting records on `entry_separator` with no renames.
    #[must_use]
    pub const fn new(entry_separator: EntrySeparator) -> Self {
        Self {
            entry_separator,
            renames: Vec::new(),
            id_policy: IdPolicy::Explicit,
        }
    }

    /// Map the raw marker `from` onto the canonical marker `to`.
    #[must_use]
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    /// Choose how records obtain their ids while parsing.
    #[must_use]
    pub const fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    /// Toolbox example files: records are separated by blank lines, and
    /// records without a reference receive a content hash.
    #[must_use]
    pub const fn toolbox() -> Self {
        Self::new(EntrySeparator::BlankLine).with_id_policy(IdPolicy::ContentHash)
    }

    /// ELAN corpora exported with the Toolbox exporter.
    #[must_use]
    pub fn elan_export() -> Self {
        Self::new(EntrySeparator::marker("utterance_id"))
            .with_rename("utterance_id", "ref")
            .with_rename("utterance", "tx")
            .with_rename("gramm_units", "mb")
            .with_rename("rp_gloss", "gl")
    }

    /// How records are delimited.
    #[must_use]
    pub const fn entry_separator(&self) -> &EntrySeparator {
        &self.entry_separator
    }

    /// Identifier policy applied to parsed records.
    #[must_use]
    pub const fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Canonical marker code for a raw code; unmapped codes pass through.
    #[must_use]
    pub fn canonical_code<'a>(&'a self, raw: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(from, _)| from == raw)
            .map_or(raw, |(_, to)| to.as_str())
    }
}

/// Errors raised while reading SFM files.
#[derive(Debug, Error)]
pub enum SfmReadError {
    #[error("failed to read SFM file {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to list SFM directory {path}")]
    ListDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Split SFM text into records according to `schema`.
///
/// Blocks with no values are dropped. A leading byte order mark and CRLF
/// line endings are accepted.
#[must_use]
pub fn parse_records(input: &str, schema: &SfmSchema) -> Vec<ExampleRecord> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut records = Vec::new();
    let mut block: Vec<(String, String)> = Vec::new();

    for line in input.lines() {
        if line.trim().is_empty() {
            if schema.entry_separator == EntrySeparator::BlankLine {
                finish_block(&mut block, schema, &mut records);
            }
            continue;
        }
        if let Some(field) = line.strip_prefix('\\') {
            let (code, value) = field
                .split_once(char::is_whitespace)
                .map_or((field.trim(), ""), |(code, value)| (code, value.trim()));
            if schema.entry_separator.opens_record(code) {
                finish_block(&mut block, schema, &mut records);
            }
            block.push((code.to_owned(), value.to_owned()));
        } else if let Some((_, value)) = block.last_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line.trim());
        } else {
            debug!("skipping text outside any field: {line:?}");
        }
    }
    finish_block(&mut block, schema, &mut records);
    records
}

fn finish_block(
    block: &mut Vec<(String, String)>,
    schema: &SfmSchema,
    records: &mut Vec<ExampleRecord>,
) {
    let fields = std::mem::take(block);
    if fields.is_empty() {
        return;
    }
    if fields.iter().all(|(code, _)| code.starts_with('_')) {
        debug!("skipping header block with {} markers", fields.len());
        return;
    }
    records.extend(build_record(fields, schema));
}

fn build_record(fields: Vec<(String, String)>, schema: &SfmSchema) -> Option<ExampleRecord> {
    if fields.iter().all(|(_, value)| value.is_empty()) {
        return None;
    }
    let mut record = ExampleRecord::new();
    for (code, value) in fields {
        record.push(schema.canonical_code(&code), value);
    }
    record.apply_policy(schema.id_policy);
    Some(record)
}

/// Read every record of one SFM file.
pub fn read_sfm_file(
    path: &Utf8Path,
    schema: &SfmSchema,
) -> Result<Vec<ExampleRecord>, SfmReadError> {
    let contents = dictionaria_fs::read_to_string(path).map_err(|source| SfmReadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_records(&contents, schema))
}

/// Read the records of every file in `dir` whose name ends with `suffix`.
///
/// Files are read in name order.
pub fn read_sfm_dir(
    dir: &Utf8Path,
    suffix: &str,
    schema: &SfmSchema,
) -> Result<Vec<ExampleRecord>, SfmReadError> {
    let files =
        dictionaria_fs::files_with_suffix(dir, suffix).map_err(|source| SfmReadError::ListDir {
            path: dir.to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    for file in files {
        let parsed = read_sfm_file(&file, schema)?;
        debug!("read {} records from {file}", parsed.len());
        records.extend(parsed);
    }
    Ok(records)
}

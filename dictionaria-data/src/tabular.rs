//! Entry and sense tables of a submission.
//!
//! Both are delimiter-separated files with a header row. Tab separated
//! files use the `.tsv` or `.tab` extension; everything else is read as
//! comma separated.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{MediaKind, MediaRef};
use log::warn;
use thiserror::Error;

/// Entry id column.
pub const ENTRY_ID: &str = "ID";
/// Headword column.
pub const HEADWORD: &str = "headword";
/// Part-of-speech column.
pub const PART_OF_SPEECH: &str = "part-of-speech";
/// Picture column.
pub const PICTURE: &str = "picture";
/// Sound column.
pub const SOUND: &str = "sound";

/// Sense id column.
pub const SENSE_ID: &str = "ID";
/// Column naming the owning entry of a sense.
pub const SENSE_ENTRY_ID: &str = "entry ID";
/// Sense description column.
pub const DESCRIPTION: &str = "description";
/// Column listing example references.
pub const EXAMPLE_ID: &str = "example ID";
/// Semantic domain column.
pub const SEMANTIC_DOMAIN: &str = "semantic domain";

const LIST_SEPARATOR: char = ';';

/// Errors raised while reading a table.
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("failed to read table {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed table {path}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("table {path} lacks the required column {column:?}")]
    MissingColumn {
        path: Utf8PathBuf,
        column: &'static str,
    },
}

/// A cell outside the core entry columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraCell {
    /// Column header as written.
    pub column: String,
    /// Cell value, trimmed.
    pub value: String,
    /// Zero-based column index.
    pub ordinal: usize,
}

/// One row of the entry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// Entry id, local to the submission.
    pub id: String,
    /// Headword.
    pub headword: String,
    /// Part of speech.
    pub part_of_speech: Option<String>,
    /// Pictures and sounds.
    pub media: Vec<MediaRef>,
    /// Non-empty cells of every other column, in column order.
    pub extra: Vec<ExtraCell>,
}

/// One row of the sense table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseRow {
    /// Sense id, when the table has one.
    pub id: Option<String>,
    /// Owning entry id.
    pub entry_id: String,
    /// Sense description, possibly listing several meanings.
    pub description: String,
    /// Example references in cell order.
    pub example_ids: Vec<String>,
    /// Semantic domain.
    pub semantic_domain: Option<String>,
}

/// Parsed entry table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryTable {
    /// Rows in file order.
    pub rows: Vec<EntryRow>,
}

/// Parsed sense table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseTable {
    /// Rows in file order.
    pub rows: Vec<SenseRow>,
}

/// Field delimiter implied by the file extension.
#[must_use]
pub fn delimiter_for(path: &Utf8Path) -> u8 {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}

struct RawTable {
    path: Utf8PathBuf,
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl RawTable {
    fn read(path: &Utf8Path) -> Result<Self, TabularError> {
        let contents = dictionaria_fs::read_to_string(path).map_err(|source| {
            TabularError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Utf8Path, contents: &str) -> Result<Self, TabularError> {
        let csv_error = |source| TabularError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_for(path))
            .flexible(true)
            .from_reader(contents.as_bytes());
        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|header| header.trim().to_owned())
            .collect();
        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_error)?;
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &'static str) -> Result<usize, TabularError> {
        self.column(name).ok_or_else(|| TabularError::MissingColumn {
            path: self.path.clone(),
            column: name,
        })
    }
}

fn cell(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|index| record.get(index))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
}

impl EntryTable {
    /// Read an entry table from disk.
    pub fn read(path: &Utf8Path) -> Result<Self, TabularError> {
        Self::from_raw(RawTable::read(path)?)
    }

    /// Parse an entry table from text; `path` selects the delimiter and
    /// labels errors.
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self, TabularError> {
        Self::from_raw(RawTable::parse(path, contents)?)
    }

    fn from_raw(table: RawTable) -> Result<Self, TabularError> {
        let id = table.require(ENTRY_ID)?;
        let headword = table.require(HEADWORD)?;
        let part_of_speech = table.require(PART_OF_SPEECH)?;
        let picture = table.column(PICTURE);
        let sound = table.column(SOUND);
        let core = [Some(id), Some(headword), Some(part_of_speech), picture, sound];

        let mut rows = Vec::with_capacity(table.records.len());
        for record in &table.records {
            let Some(entry_id) = cell(record, Some(id)) else {
                warn!("skipping entry without an id in {}", table.path);
                continue;
            };
            let media = [(picture, MediaKind::Picture), (sound, MediaKind::Audio)]
                .into_iter()
                .flat_map(|(column, kind)| {
                    cell(record, column)
                        .map(|value| split_list(&value).collect::<Vec<_>>())
                        .unwrap_or_default()
                        .into_iter()
                        .map(move |name| MediaRef { kind, name })
                })
                .collect();
            let extra = table
                .headers
                .iter()
                .enumerate()
                .filter(|(ordinal, _)| !core.contains(&Some(*ordinal)))
                .filter_map(|(ordinal, column)| {
                    cell(record, Some(ordinal)).map(|value| ExtraCell {
                        column: column.clone(),
                        value,
                        ordinal,
                    })
                })
                .collect();
            rows.push(EntryRow {
                id: entry_id,
                headword: cell(record, Some(headword)).unwrap_or_default(),
                part_of_speech: cell(record, Some(part_of_speech)),
                media,
                extra,
            });
        }
        Ok(Self { rows })
    }
}

impl SenseTable {
    /// Read a sense table from disk.
    pub fn read(path: &Utf8Path) -> Result<Self, TabularError> {
        Self::from_raw(RawTable::read(path)?)
    }

    /// Parse a sense table from text.
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self, TabularError> {
        Self::from_raw(RawTable::parse(path, contents)?)
    }

    fn from_raw(table: RawTable) -> Result<Self, TabularError> {
        let entry_id = table.require(SENSE_ENTRY_ID)?;
        let description = table.require(DESCRIPTION)?;
        let id = table.column(SENSE_ID);
        let example_id = table.column(EXAMPLE_ID);
        let semantic_domain = table.column(SEMANTIC_DOMAIN);

        let rows = table
            .records
            .iter()
            .filter_map(|record| {
                let Some(owner) = cell(record, Some(entry_id)) else {
                    warn!("skipping sense without an entry id in {}", table.path);
                    return None;
                };
                Some(SenseRow {
                    id: cell(record, id),
                    entry_id: owner,
                    description: cell(record, Some(description)).unwrap_or_default(),
                    example_ids: cell(record, example_id)
                        .map(|value| split_list(&value).collect())
                        .unwrap_or_default(),
                    semantic_domain: cell(record, semantic_domain),
                })
            })
            .collect();
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("entries.tsv", b'\t')]
    #[case("entries.TAB", b'\t')]
    #[case("entries.csv", b',')]
    #[case("entries", b',')]
    fn picks_delimiter_from_extension(#[case] path: &str, #[case] expected: u8) {
        assert_eq!(delimiter_for(Utf8Path::new(path)), expected);
    }

    #[rstest]
    fn parses_entries_with_media_and_extra_columns() {
        let table = EntryTable::parse(
            Utf8Path::new("entries.csv"),
            "ID,headword,part-of-speech,picture,dialect,associated lemma (synonym)\n\
             1,dog,n,dog.jpg ; dog2.jpg,north,2\n\
             2,hound,,,,\n",
        )
        .expect("parse entries");

        assert_eq!(table.rows.len(), 2);
        let dog = &table.rows[0];
        assert_eq!(dog.part_of_speech.as_deref(), Some("n"));
        assert_eq!(
            dog.media,
            vec![
                MediaRef { kind: MediaKind::Picture, name: "dog.jpg".into() },
                MediaRef { kind: MediaKind::Picture, name: "dog2.jpg".into() },
            ]
        );
        assert_eq!(
            dog.extra,
            vec![
                ExtraCell { column: "dialect".into(), value: "north".into(), ordinal: 4 },
                ExtraCell {
                    column: "associated lemma (synonym)".into(),
                    value: "2".into(),
                    ordinal: 5
                },
            ]
        );
        let hound = &table.rows[1];
        assert_eq!(hound.part_of_speech, None);
        assert!(hound.extra.is_empty());
    }

    #[rstest]
    fn reads_tab_separated_senses() {
        let table = SenseTable::parse(
            Utf8Path::new("senses.tsv"),
            "ID\tentry ID\tdescription\texample ID\n\
             s1\t1\tdog ; hound\tBei.001 ; Bei.2\n\
             \t2\thunting dog\t\n",
        )
        .expect("parse senses");
        assert_eq!(
            table.rows[0],
            SenseRow {
                id: Some("s1".into()),
                entry_id: "1".into(),
                description: "dog ; hound".into(),
                example_ids: vec!["Bei.001".into(), "Bei.2".into()],
                semantic_domain: None,
            }
        );
        assert_eq!(table.rows[1].id, None);
        assert!(table.rows[1].example_ids.is_empty());
    }

    #[rstest]
    fn rejects_missing_required_columns() {
        let err = EntryTable::parse(Utf8Path::new("entries.csv"), "ID,headword\n1,dog\n")
            .expect_err("part-of-speech is required");
        match err {
            TabularError::MissingColumn { column, .. } => assert_eq!(column, PART_OF_SPEECH),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn skips_rows_without_ids() {
        let table = EntryTable::parse(
            Utf8Path::new("entries.csv"),
            "ID,headword,part-of-speech\n,orphan,n\n3,cat,n\n",
        )
        .expect("parse entries");
        let ids: Vec<_> = table.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
    }
}

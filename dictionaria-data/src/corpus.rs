//! Lookup of example records by reference, with typo-tolerant keys.

use std::{cell::OnceCell, collections::HashMap};

use camino::Utf8Path;
use dictionaria_core::ExampleRecord;
use log::warn;

use crate::sfm::{SfmReadError, SfmSchema, read_sfm_dir};

/// File suffix of ELAN corpus exports.
pub const CORPUS_SUFFIX: &str = ".eaf.sfm";

/// Example records of one submission, indexed by their `\ref` value.
///
/// The key map is built on the first lookup and never rebuilt; create a
/// new index when the underlying files change.
///
/// # Examples
/// ```
/// use dictionaria_core::{ExampleRecord, Marker};
/// use dictionaria_data::corpus::CorpusIndex;
///
/// let mut record = ExampleRecord::new();
/// record.set(Marker::Ref, "Abc.034");
/// let index = CorpusIndex::new(vec![record]);
///
/// assert!(index.lookup("Abc.34").is_some());
/// assert!(index.lookup("Xyz").is_none());
/// ```
#[derive(Debug, Default)]
pub struct CorpusIndex {
    records: Vec<ExampleRecord>,
    keys: OnceCell<HashMap<String, usize>>,
}

impl CorpusIndex {
    /// Index the given records.
    #[must_use]
    pub fn new(records: Vec<ExampleRecord>) -> Self {
        Self {
            records,
            keys: OnceCell::new(),
        }
    }

    /// Read every corpus file under `dir` and index the records.
    pub fn from_dir(dir: &Utf8Path, schema: &SfmSchema) -> Result<Self, SfmReadError> {
        read_sfm_dir(dir, CORPUS_SUFFIX, schema).map(Self::new)
    }

    /// Whether the key map has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.keys.get().is_some()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in read order.
    #[must_use]
    pub fn records(&self) -> &[ExampleRecord] {
        &self.records
    }

    /// Exact lookup by reference.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExampleRecord> {
        self.keys()
            .get(key)
            .and_then(|position| self.records.get(*position))
    }

    /// Look up `key`, retrying with a zero-padded number on a miss.
    ///
    /// `Abc.34` finds a record stored as `Abc.034`. Keys that cannot be
    /// corrected simply miss.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&ExampleRecord> {
        self.get(key).or_else(|| {
            corrected_key(key).and_then(|corrected| self.get(&corrected))
        })
    }

    fn keys(&self) -> &HashMap<String, usize> {
        self.keys.get_or_init(|| {
            let mut keys = HashMap::with_capacity(self.records.len());
            for (position, record) in self.records.iter().enumerate() {
                let Some(key) = record.reference() else {
                    continue;
                };
                if keys.insert(key.to_owned(), position).is_some() {
                    warn!("duplicate example reference {key}; keeping the later record");
                }
            }
            keys
        })
    }
}

/// Zero-pad the numeric part of a `prefix.number` key to three digits.
///
/// Returns `None` when the key has no `.`, when the part after the first
/// `.` is not a number, or when padding would not change the key.
///
/// # Examples
/// ```
/// use dictionaria_data::corpus::corrected_key;
///
/// assert_eq!(corrected_key("Abc.34").as_deref(), Some("Abc.034"));
/// assert_eq!(corrected_key("Abc.034"), None);
/// assert_eq!(corrected_key("Abc.x"), None);
/// ```
#[must_use]
pub fn corrected_key(key: &str) -> Option<String> {
    let (prefix, number) = key.split_once('.')?;
    let number: u64 = number.trim().parse().ok()?;
    let corrected = format!("{prefix}.{number:03}");
    (corrected != key).then_some(corrected)
}

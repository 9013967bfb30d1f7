//! Builds the object graph of one submission from its tables.
//!
//! Entries become words in a first pass so that the second pass can link
//! "associated" columns to words appearing later in the table. Senses then
//! become meanings linked to corpus examples and to concepts of the
//! vocabulary.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
    sync::LazyLock,
};

use dictionaria_core::{
    Counterpart, CrossReference, Meaning, MeaningResolver, MetadataPair, Sentence,
    SubmissionGraph, Word, has_comparison_meaning,
    ids::{normalise_target_id, scoped_id, value_set_id},
};
use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use crate::{
    corpus::CorpusIndex,
    tabular::{EntryRow, EntryTable, SenseTable},
};

static ASSOCIATION_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^associated\s+\w+(?:\s*\((?P<rel>[^)]+)\))?$").ok()
});

/// An "associated" column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Relation label from the parenthesised suffix.
    pub relation: Option<String>,
}

/// Parse a column header of the form `associated <noun> (<relation>)`.
///
/// # Examples
/// ```
/// use dictionaria_data::loader::parse_association_header;
///
/// let synonym = parse_association_header("associated lemma (synonym)").expect("association");
/// assert_eq!(synonym.relation.as_deref(), Some("synonym"));
///
/// let plain = parse_association_header("Associated lemma").expect("association");
/// assert_eq!(plain.relation, None);
///
/// assert!(parse_association_header("dialect").is_none());
/// ```
#[must_use]
pub fn parse_association_header(header: &str) -> Option<Association> {
    let captures = ASSOCIATION_HEADER.as_ref()?.captures(header.trim())?;
    let relation = captures
        .name("rel")
        .map(|relation| relation.as_str().trim().to_owned())
        .filter(|relation| !relation.is_empty());
    Some(Association { relation })
}

/// A recoverable problem met while loading; the offending link is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// An associated column names an entry that does not exist.
    MissingCrossReferenceTarget {
        /// Word holding the association.
        word_id: String,
        /// Target as written in the cell.
        target: String,
    },
    /// A sense names an entry that does not exist.
    UnknownEntry {
        /// Sense id or position.
        sense: String,
        /// Entry id as written.
        entry_id: String,
    },
    /// A sense would reuse the id of a meaning already loaded.
    DuplicateMeaning {
        /// Sense id or position.
        sense: String,
        /// The contested meaning id.
        meaning_id: String,
    },
    /// A sense references an example missing from the corpus.
    UnresolvedExample {
        /// Meaning holding the reference.
        meaning_id: String,
        /// Example id as written.
        example_id: String,
    },
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCrossReferenceTarget { word_id, target } => {
                write!(f, "word {word_id} is associated with unknown entry {target:?}")
            }
            Self::UnknownEntry { sense, entry_id } => {
                write!(f, "sense {sense} belongs to unknown entry {entry_id:?}")
            }
            Self::DuplicateMeaning { sense, meaning_id } => {
                write!(f, "sense {sense} reuses meaning id {meaning_id:?}")
            }
            Self::UnresolvedExample {
                meaning_id,
                example_id,
            } => write!(f, "meaning {meaning_id} cites unknown example {example_id:?}"),
        }
    }
}

/// Errors that abort loading a submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("entry id {id:?} appears more than once")]
    DuplicateEntry { id: String },
}

/// The graph built for a submission plus the links that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Objects to persist.
    pub graph: SubmissionGraph,
    /// Skipped links, in the order they were met.
    pub issues: Vec<LoadIssue>,
}

/// Everything the loader needs besides the tables.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    /// Submission id used to scope every generated id.
    pub submission_id: &'a str,
    /// Language of the dictionary.
    pub language_id: &'a str,
    /// Resolver over the concept vocabulary.
    pub resolver: MeaningResolver<'a>,
    /// Examples of the submission.
    pub corpus: &'a CorpusIndex,
    /// Display labels replacing entry column headers.
    pub labels: &'a BTreeMap<String, String>,
}

/// Load one submission.
///
/// # Errors
/// Returns [`LoadError::DuplicateEntry`] when two entries share an id.
pub fn load_submission(
    context: &LoadContext<'_>,
    entries: &EntryTable,
    senses: &SenseTable,
) -> Result<LoadOutcome, LoadError> {
    let mut loader = Loader {
        context,
        outcome: LoadOutcome::default(),
        words: HashMap::with_capacity(entries.rows.len()),
    };
    loader.add_sentences();
    loader.add_words(entries)?;
    loader.add_cross_references(entries);
    loader.add_meanings(senses);
    Ok(loader.outcome)
}

struct Loader<'c, 'a> {
    context: &'c LoadContext<'a>,
    outcome: LoadOutcome,
    // normalised entry id -> (word id, headword)
    words: HashMap<String, (String, String)>,
}

impl Loader<'_, '_> {
    fn scoped(&self, local: &str) -> String {
        scoped_id(self.context.submission_id, local)
    }

    fn add_sentences(&mut self) {
        let records = self.context.corpus.records();
        let mut sentences: Vec<Sentence> = Vec::with_capacity(records.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
        for record in records {
            let sentence = Sentence::from_record(self.context.submission_id, record);
            if let Some(slot) = positions
                .get(&sentence.id)
                .and_then(|&position| sentences.get_mut(position))
            {
                *slot = sentence;
                continue;
            }
            positions.insert(sentence.id.clone(), sentences.len());
            sentences.push(sentence);
        }
        for sentence in sentences {
            self.outcome.graph.add_sentence(sentence);
        }
    }

    fn add_words(&mut self, entries: &EntryTable) -> Result<(), LoadError> {
        for row in &entries.rows {
            let word_id = self.scoped(&row.id);
            let key = normalise_target_id(&row.id);
            if self.words.contains_key(&key) {
                return Err(LoadError::DuplicateEntry { id: row.id.clone() });
            }
            self.words
                .insert(key, (word_id.clone(), row.headword.clone()));
            self.outcome.graph.add_word(Word {
                id: word_id,
                headword: row.headword.clone(),
                part_of_speech: row.part_of_speech.clone(),
                media: row.media.clone(),
                metadata: self.metadata(row),
            });
        }
        Ok(())
    }

    fn metadata(&self, row: &EntryRow) -> Vec<MetadataPair> {
        row.extra
            .iter()
            .filter(|cell| parse_association_header(&cell.column).is_none())
            .map(|cell| MetadataPair {
                key: self
                    .context
                    .labels
                    .get(&cell.column)
                    .cloned()
                    .unwrap_or_else(|| cell.column.clone()),
                value: cell.value.clone(),
                ordinal: cell.ordinal,
            })
            .collect()
    }

    fn add_cross_references(&mut self, entries: &EntryTable) {
        for row in &entries.rows {
            let source_word_id = self.scoped(&row.id);
            for cell in &row.extra {
                let Some(association) = parse_association_header(&cell.column) else {
                    continue;
                };
                for target in cell.value.split(';').map(str::trim).filter(|t| !t.is_empty()) {
                    match self.words.get(&normalise_target_id(target)) {
                        Some((target_word_id, _)) => {
                            self.outcome.graph.add_cross_reference(CrossReference {
                                source_word_id: source_word_id.clone(),
                                target_word_id: target_word_id.clone(),
                                relation: association.relation.clone(),
                            });
                        }
                        None => {
                            warn!("{source_word_id}: no entry {target:?} to associate with");
                            self.outcome
                                .issues
                                .push(LoadIssue::MissingCrossReferenceTarget {
                                    word_id: source_word_id.clone(),
                                    target: target.to_owned(),
                                });
                        }
                    }
                }
            }
        }
    }

    fn add_meanings(&mut self, senses: &SenseTable) {
        let mut per_word: HashMap<String, usize> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::with_capacity(senses.rows.len());
        for (position, sense) in senses.rows.iter().enumerate() {
            let sense_label = || {
                sense
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("#{}", position + 1))
            };
            let Some((word_id, headword)) =
                self.words.get(&normalise_target_id(&sense.entry_id)).cloned()
            else {
                let sense_label = sense_label();
                warn!("sense {sense_label} belongs to unknown entry {:?}", sense.entry_id);
                self.outcome.issues.push(LoadIssue::UnknownEntry {
                    sense: sense_label,
                    entry_id: sense.entry_id.clone(),
                });
                continue;
            };
            let ordinal = per_word.entry(word_id.clone()).or_default();
            *ordinal += 1;
            let meaning_id = sense
                .id
                .as_deref()
                .map_or_else(|| format!("{word_id}-{ordinal}"), |id| self.scoped(id));
            if !seen.insert(meaning_id.clone()) {
                let sense_label = sense_label();
                warn!("sense {sense_label} reuses meaning id {meaning_id}; skipping");
                self.outcome.issues.push(LoadIssue::DuplicateMeaning {
                    sense: sense_label,
                    meaning_id,
                });
                continue;
            }

            let example_ids = self.resolve_examples(&meaning_id, &sense.example_ids);
            let resolved = self.context.resolver.resolve_description(&sense.description);
            for (index, meaning) in resolved.iter().enumerate() {
                let Some(concept) = &meaning.concept else {
                    continue;
                };
                let value_set = value_set_id(&meaning_id, index);
                self.outcome.graph.value_set(
                    &value_set,
                    &concept.concept_id,
                    self.context.language_id,
                );
                self.outcome.graph.add_counterpart(Counterpart {
                    id: value_set.clone(),
                    value_set_id: value_set,
                    word_id: word_id.clone(),
                    name: headword.clone(),
                });
            }
            self.outcome.graph.add_meaning(Meaning {
                id: meaning_id,
                word_id,
                description: sense.description.clone(),
                semantic_domain: sense.semantic_domain.clone(),
                example_ids,
                has_comparison_meaning: has_comparison_meaning(&resolved),
            });
        }
    }

    fn resolve_examples(&mut self, meaning_id: &str, example_ids: &[String]) -> Vec<String> {
        let mut linked = Vec::with_capacity(example_ids.len());
        for example_id in example_ids {
            match self.context.corpus.lookup(example_id) {
                Some(record) => {
                    let sentence_id = self.scoped(&record.identity());
                    if !linked.contains(&sentence_id) {
                        linked.push(sentence_id);
                    }
                }
                None => {
                    debug!("{meaning_id}: example {example_id:?} not in corpus");
                    self.outcome.issues.push(LoadIssue::UnresolvedExample {
                        meaning_id: meaning_id.to_owned(),
                        example_id: example_id.clone(),
                    });
                }
            }
        }
        linked
    }
}

#[cfg(test)]
mod tests;

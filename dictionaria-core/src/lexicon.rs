//! The object graph produced by loading one dictionary submission.
//!
//! These are plain records handed to a [`DictionaryStore`](crate::DictionaryStore);
//! every id is derived deterministically from the submission id and source
//! row ids.

use std::collections::BTreeMap;

use crate::{ids::scoped_id, sfm::ExampleRecord};

/// A language described by a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Language {
    /// Glottocode or other stable language id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// An author of a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contributor {
    /// Slug of family and given names.
    pub id: String,
    /// Name as written in the submission metadata.
    pub name: String,
}

/// A published dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dictionary {
    /// Submission id.
    pub id: String,
    /// Dictionary title.
    pub name: String,
    /// Introductory text, if the submission ships one.
    pub description: Option<String>,
    /// The described language.
    pub language: Language,
    /// Publication date as `YYYY-MM-DD`.
    pub published: Option<String>,
    /// Authors in citation order.
    pub contributors: Vec<Contributor>,
    /// Entry columns the dictionary wants displayed as custom fields.
    pub custom_fields: Vec<String>,
}

/// An example sentence persisted from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentence {
    /// Submission-scoped example id.
    pub id: String,
    /// Vernacular text.
    pub text: Option<String>,
    /// Tab separated morpheme breaks.
    pub analyzed: Option<String>,
    /// Tab separated glosses.
    pub gloss: Option<String>,
    /// Free translation.
    pub translation: Option<String>,
    /// Reference into the source corpus.
    pub corpus_ref: Option<String>,
    /// Sound file reference.
    pub sound_file: Option<String>,
}

impl Sentence {
    /// Build the persisted form of a corpus example.
    ///
    /// The record is not modified; examples without an explicit reference
    /// use their content hash.
    #[must_use]
    pub fn from_record(submission: &str, record: &ExampleRecord) -> Self {
        Self {
            id: scoped_id(submission, &record.identity()),
            text: record.text().map(str::to_owned),
            analyzed: record.morphemes(),
            gloss: record.gloss(),
            translation: record.translation().map(str::to_owned),
            corpus_ref: record.corpus_ref().map(str::to_owned),
            sound_file: record.get(crate::sfm::Marker::Sf).map(str::to_owned),
        }
    }
}

/// Kind of media attached to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaKind {
    /// An image file.
    Picture,
    /// A sound recording.
    Audio,
}

impl MediaKind {
    /// Stable lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Picture => "picture",
            Self::Audio => "audio",
        }
    }
}

/// Reference to a media file attached to a word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaRef {
    /// Kind of media.
    pub kind: MediaKind,
    /// File name or identifier as given in the entry table.
    pub name: String,
}

/// A free-form column value of an entry row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataPair {
    /// Column header.
    pub key: String,
    /// Cell value.
    pub value: String,
    /// Column index in the source table; preserves display order.
    pub ordinal: usize,
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// Submission-scoped id.
    pub id: String,
    /// Headword.
    pub headword: String,
    /// Part of speech, if given.
    pub part_of_speech: Option<String>,
    /// Attached media.
    pub media: Vec<MediaRef>,
    /// Non-core columns in column order.
    pub metadata: Vec<MetadataPair>,
}

/// A sense of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meaning {
    /// Submission-scoped id.
    pub id: String,
    /// Owning word.
    pub word_id: String,
    /// Sense description as written.
    pub description: String,
    /// Semantic domain, if given.
    pub semantic_domain: Option<String>,
    /// Ids of linked example sentences.
    pub example_ids: Vec<String>,
    /// Whether any atomic meaning resolved to a concept.
    pub has_comparison_meaning: bool,
}

/// A "see also" link between two words.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossReference {
    /// Word the link starts from.
    pub source_word_id: String,
    /// Word the link points to.
    pub target_word_id: String,
    /// Relation label such as `synonym`.
    pub relation: Option<String>,
}

/// Groups the words of one language that express a concept.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSet {
    /// `<meaning-id>-<index>`.
    pub id: String,
    /// Concept expressed.
    pub concept_id: String,
    /// Language of the words.
    pub language_id: String,
}

/// Association of a word with a value set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counterpart {
    /// Shares the value set id.
    pub id: String,
    /// Owning value set.
    pub value_set_id: String,
    /// The word expressing the concept.
    pub word_id: String,
    /// Headword, for display.
    pub name: String,
}

/// Everything created while loading one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionGraph {
    sentences: Vec<Sentence>,
    words: Vec<Word>,
    meanings: Vec<Meaning>,
    cross_references: Vec<CrossReference>,
    value_sets: BTreeMap<String, ValueSet>,
    counterparts: BTreeMap<String, Counterpart>,
}

impl SubmissionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an example sentence.
    pub fn add_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    /// Record a word.
    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Record a meaning.
    pub fn add_meaning(&mut self, meaning: Meaning) {
        self.meanings.push(meaning);
    }

    /// Record a cross-reference.
    pub fn add_cross_reference(&mut self, cross_reference: CrossReference) {
        self.cross_references.push(cross_reference);
    }

    /// Return the value set with `id`, creating it when missing.
    pub fn value_set(&mut self, id: &str, concept_id: &str, language_id: &str) -> &ValueSet {
        self.value_sets
            .entry(id.to_owned())
            .or_insert_with(|| ValueSet {
                id: id.to_owned(),
                concept_id: concept_id.to_owned(),
                language_id: language_id.to_owned(),
            })
    }

    /// Record a counterpart; a counterpart with the same id is replaced.
    pub fn add_counterpart(&mut self, counterpart: Counterpart) {
        self.counterparts
            .insert(counterpart.id.clone(), counterpart);
    }

    /// Example sentences in insertion order.
    #[must_use]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Words in insertion order.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Meanings in insertion order.
    #[must_use]
    pub fn meanings(&self) -> &[Meaning] {
        &self.meanings
    }

    /// Cross-references in insertion order.
    #[must_use]
    pub fn cross_references(&self) -> &[CrossReference] {
        &self.cross_references
    }

    /// Value sets ordered by id.
    pub fn value_sets(&self) -> impl Iterator<Item = &ValueSet> {
        self.value_sets.values()
    }

    /// Counterparts ordered by id.
    pub fn counterparts(&self) -> impl Iterator<Item = &Counterpart> {
        self.counterparts.values()
    }

    /// Word by id.
    #[must_use]
    pub fn word(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|word| word.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfm::Marker;
    use rstest::rstest;

    #[rstest]
    fn sentence_uses_scoped_reference() {
        let mut record = ExampleRecord::new();
        record.set(Marker::Ref, "Bei.001");
        record.set(Marker::Tx, "A beiko.");
        record.set(Marker::Mb, "a beiko");
        let sentence = Sentence::from_record("daakaka", &record);
        assert_eq!(sentence.id, "daakaka-Bei.001");
        assert_eq!(sentence.analyzed.as_deref(), Some("a\tbeiko"));
        assert_eq!(sentence.gloss, None);
    }

    #[rstest]
    fn sentence_without_reference_uses_content_hash() {
        let mut record = ExampleRecord::new();
        record.set(Marker::Tx, "A beiko.");
        let sentence = Sentence::from_record("daakaka", &record);
        let expected = format!("daakaka-{}", record.id());
        assert_eq!(sentence.id, expected);
    }

    #[rstest]
    fn value_sets_are_reused_by_id() {
        let mut graph = SubmissionGraph::new();
        graph.value_set("d-1-0", "2009", "daak1235");
        let reused = graph.value_set("d-1-0", "1227", "daak1235").clone();
        assert_eq!(reused.concept_id, "2009");
        assert_eq!(graph.value_sets().count(), 1);
    }

    #[rstest]
    fn counterparts_are_keyed_by_id() {
        let mut graph = SubmissionGraph::new();
        for name in ["dog", "dog"] {
            graph.add_counterpart(Counterpart {
                id: "d-1-0".into(),
                value_set_id: "d-1-0".into(),
                word_id: "d-1".into(),
                name: name.into(),
            });
        }
        assert_eq!(graph.counterparts().count(), 1);
    }
}

//! Unit tests for the entry and sense loader.

use super::*;
use camino::Utf8Path;
use dictionaria_core::{ConceptVocabulary, ExampleRecord, Marker};
use rstest::{fixture, rstest};

fn entries(csv: &str) -> EntryTable {
    EntryTable::parse(Utf8Path::new("entries.csv"), csv).expect("parse entries")
}

fn senses(csv: &str) -> SenseTable {
    SenseTable::parse(Utf8Path::new("senses.csv"), csv).expect("parse senses")
}

#[fixture]
fn vocabulary() -> ConceptVocabulary {
    ConceptVocabulary::builder()
        .concept("2009", "dog", None)
        .concept("1227", "water", None)
        .alternate_label("hunting dog", "2009")
        .expect("known concept")
        .build()
}

#[fixture]
fn corpus() -> CorpusIndex {
    let mut child = ExampleRecord::new();
    child.set(Marker::Ref, "Bei.001");
    child.set(Marker::Tx, "A beiko.");
    child.set(Marker::Ft, "The child.");
    let mut water = ExampleRecord::new();
    water.set(Marker::Tx, "Wai.");
    water.set(Marker::Ft, "Water.");
    CorpusIndex::new(vec![child, water])
}

fn load(
    vocabulary: &ConceptVocabulary,
    corpus: &CorpusIndex,
    entry_csv: &str,
    sense_csv: &str,
) -> Result<LoadOutcome, LoadError> {
    let labels = BTreeMap::from([("dialect".to_owned(), "Dialect".to_owned())]);
    let context = LoadContext {
        submission_id: "daakaka",
        language_id: "daak1235",
        resolver: MeaningResolver::new(vocabulary),
        corpus,
        labels: &labels,
    };
    load_submission(&context, &entries(entry_csv), &senses(sense_csv))
}

const TWO_DOGS: &str = "ID,headword,part-of-speech,dialect,associated lemma\n\
1,dog,n,north,2\n\
2,hound,n,,\n";

#[rstest]
#[case("associated lemma (synonym)", Some(Some("synonym")))]
#[case("associated lemma", Some(None))]
#[case("ASSOCIATED entry ( antonym )", Some(Some("antonym")))]
#[case("associated", None)]
#[case("lemma associated", None)]
fn parses_association_headers(#[case] header: &str, #[case] expected: Option<Option<&str>>) {
    let parsed = parse_association_header(header);
    assert_eq!(
        parsed.as_ref().map(|a| a.relation.as_deref()),
        expected
    );
}

#[rstest]
fn association_header_pattern_compiles() {
    assert!(ASSOCIATION_HEADER.is_some());
}

#[rstest]
fn creates_words_with_labelled_metadata(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, "entry ID,description\n").expect("load");
    let dog = outcome.graph.word("daakaka-1").expect("dog");
    assert_eq!(dog.headword, "dog");
    assert_eq!(
        dog.metadata,
        vec![MetadataPair {
            key: "Dialect".into(),
            value: "north".into(),
            ordinal: 3
        }]
    );
    assert_eq!(outcome.graph.words().len(), 2);
}

#[rstest]
fn links_forward_cross_references(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, "entry ID,description\n").expect("load");
    assert_eq!(
        outcome.graph.cross_references(),
        &[CrossReference {
            source_word_id: "daakaka-1".into(),
            target_word_id: "daakaka-2".into(),
            relation: None,
        }]
    );
    assert!(outcome.issues.is_empty());
}

#[rstest]
fn targets_are_normalised_before_lookup(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let table = "ID,headword,part-of-speech,associated form (variant)\n\
                 A 1,dog,n,b2 ; zz\n\
                 B2,hound,n,\n";
    let outcome = load(&vocabulary, &corpus, table, "entry ID,description\n").expect("load");
    assert_eq!(outcome.graph.cross_references().len(), 1);
    assert_eq!(outcome.graph.cross_references()[0].target_word_id, "daakaka-B2");
    assert_eq!(
        outcome.graph.cross_references()[0].relation.as_deref(),
        Some("variant")
    );
    assert_eq!(
        outcome.issues,
        vec![LoadIssue::MissingCrossReferenceTarget {
            word_id: "daakaka-A 1".into(),
            target: "zz".into(),
        }]
    );
}

#[rstest]
fn rejects_duplicate_entries(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let table = "ID,headword,part-of-speech\n1,dog,n\n 1 ,hound,n\n";
    let err = load(&vocabulary, &corpus, table, "entry ID,description\n").expect_err("duplicate");
    assert_eq!(err, LoadError::DuplicateEntry { id: "1".into() });
}

#[rstest]
fn resolves_meanings_to_value_sets(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let sense_csv = "ID,entry ID,description\ns1,1,puppy ; Dog ; hunting dog\n";
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, sense_csv).expect("load");

    let meaning = &outcome.graph.meanings()[0];
    assert_eq!(meaning.id, "daakaka-s1");
    assert!(meaning.has_comparison_meaning);

    let value_sets: Vec<_> = outcome
        .graph
        .value_sets()
        .map(|vs| (vs.id.as_str(), vs.concept_id.as_str(), vs.language_id.as_str()))
        .collect();
    assert_eq!(
        value_sets,
        vec![
            ("daakaka-s1-1", "2009", "daak1235"),
            ("daakaka-s1-2", "2009", "daak1235"),
        ]
    );
    let counterpart = outcome.graph.counterparts().next().expect("counterpart");
    assert_eq!(counterpart.word_id, "daakaka-1");
    assert_eq!(counterpart.name, "dog");
    assert_eq!(counterpart.value_set_id, counterpart.id);
}

#[rstest]
fn unresolved_meanings_have_no_comparison(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let sense_csv = "entry ID,description\n2,young dog ; cur\n2,puppy\n";
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, sense_csv).expect("load");
    let ids: Vec<_> = outcome.graph.meanings().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["daakaka-2-1", "daakaka-2-2"]);
    assert!(outcome.graph.meanings().iter().all(|m| !m.has_comparison_meaning));
    assert_eq!(outcome.graph.value_sets().count(), 0);
}

#[rstest]
fn links_examples_through_the_corpus(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let sense_csv = "ID,entry ID,description,example ID\ns1,1,dog,Bei.1 ; Bei.001 ; Nope.3\n";
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, sense_csv).expect("load");
    assert_eq!(
        outcome.graph.meanings()[0].example_ids,
        vec!["daakaka-Bei.001".to_owned()]
    );
    assert_eq!(
        outcome.issues,
        vec![LoadIssue::UnresolvedExample {
            meaning_id: "daakaka-s1".into(),
            example_id: "Nope.3".into(),
        }]
    );
}

#[rstest]
fn emits_every_corpus_example(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, "entry ID,description\n").expect("load");
    let sentences = outcome.graph.sentences();
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].id, "daakaka-Bei.001");
    assert_eq!(sentences[1].id.len(), "daakaka-".len() + 32);
}

#[rstest]
fn skips_senses_of_unknown_entries(vocabulary: ConceptVocabulary, corpus: CorpusIndex) {
    let sense_csv = "entry ID,description\n9,dog\n";
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, sense_csv).expect("load");
    assert!(outcome.graph.meanings().is_empty());
    assert_eq!(
        outcome.issues,
        vec![LoadIssue::UnknownEntry {
            sense: "#1".into(),
            entry_id: "9".into(),
        }]
    );
    assert_eq!(
        outcome.issues[0].to_string(),
        "sense #1 belongs to unknown entry \"9\""
    );
}

#[rstest]
fn positional_meaning_id_never_overwrites_an_explicit_one(
    vocabulary: ConceptVocabulary,
    corpus: CorpusIndex,
) {
    let sense_csv = "ID,entry ID,description\n1-1,2,puppy\n,1,dog\n";
    let outcome = load(&vocabulary, &corpus, TWO_DOGS, sense_csv).expect("load");

    let meanings = outcome.graph.meanings();
    assert_eq!(meanings.len(), 1);
    assert_eq!(meanings[0].id, "daakaka-1-1");
    assert_eq!(meanings[0].word_id, "daakaka-2");
    assert_eq!(meanings[0].description, "puppy");
    assert_eq!(
        outcome.issues,
        vec![LoadIssue::DuplicateMeaning {
            sense: "#2".into(),
            meaning_id: "daakaka-1-1".into(),
        }]
    );
    assert_eq!(
        outcome.issues[0].to_string(),
        "sense #2 reuses meaning id \"daakaka-1-1\""
    );
}

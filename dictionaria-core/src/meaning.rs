//! Splitting sense descriptions and resolving them against a concept list.
//!
//! Free-text senses such as `"dog ; domestic dog"` are split into atomic
//! meanings, each of which may map onto a concept of a controlled
//! vocabulary (Concepticon-like). Most senses will not map; an unmatched
//! meaning is not an error.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Character separating atomic meanings in a sense description.
pub const MEANING_SEPARATOR: char = ';';

/// Split a sense description into trimmed, non-empty atomic meanings.
///
/// # Examples
/// ```
/// use dictionaria_core::meaning::split_meanings;
///
/// assert_eq!(
///     split_meanings("dog ; domestic dog ; canine"),
///     vec!["dog", "domestic dog", "canine"]
/// );
/// assert_eq!(split_meanings("dog ;; cat"), vec!["dog", "cat"]);
/// ```
#[must_use]
pub fn split_meanings(description: &str) -> Vec<String> {
    description
        .split(MEANING_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A concept of the controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// Stable concept identifier.
    pub id: String,
    /// Lowercased primary label.
    pub label: String,
    /// Optional definition text.
    pub definition: Option<String>,
}

/// Errors raised while assembling a [`ConceptVocabulary`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum VocabularyError {
    /// An alternate label refers to a concept that was never added.
    #[error("alternate label {label:?} refers to unknown concept {concept_id}")]
    UnknownConcept {
        /// The alternate label being registered.
        label: String,
        /// The missing concept id.
        concept_id: String,
    },
}

/// Immutable concept vocabulary with primary and alternate label tables.
///
/// Labels are case-folded on insertion and on lookup. Build one with
/// [`ConceptVocabulary::builder`] at start-up and share it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptVocabulary {
    concepts: BTreeMap<String, Concept>,
    primary: HashMap<String, String>,
    alternate: HashMap<String, String>,
}

impl ConceptVocabulary {
    /// Start assembling a vocabulary.
    #[must_use]
    pub fn builder() -> ConceptVocabularyBuilder {
        ConceptVocabularyBuilder::default()
    }

    /// Concept by id.
    #[must_use]
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// All concepts ordered by id.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Number of concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether the vocabulary has no concepts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    fn primary_concept(&self, folded: &str) -> Option<&Concept> {
        self.primary.get(folded).and_then(|id| self.concepts.get(id))
    }

    fn alternate_concept(&self, folded: &str) -> Option<&Concept> {
        self.alternate.get(folded).and_then(|id| self.concepts.get(id))
    }
}

/// Builder for [`ConceptVocabulary`].
#[derive(Debug, Default)]
pub struct ConceptVocabularyBuilder {
    vocabulary: ConceptVocabulary,
}

impl ConceptVocabularyBuilder {
    /// Add a concept and register its label in the primary table.
    ///
    /// A later concept with the same label takes over that label. Adding an
    /// id again replaces the concept and releases its previous label.
    #[must_use]
    pub fn concept(
        mut self,
        id: impl Into<String>,
        label: &str,
        definition: Option<String>,
    ) -> Self {
        let id = id.into();
        let label = fold_label(label);
        if let Some(previous) = self.vocabulary.concepts.get(&id)
            && self.vocabulary.primary.get(&previous.label) == Some(&id)
        {
            self.vocabulary.primary.remove(&previous.label);
        }
        self.vocabulary.primary.insert(label.clone(), id.clone());
        self.vocabulary.concepts.insert(
            id.clone(),
            Concept {
                id,
                label,
                definition,
            },
        );
        self
    }

    /// Register an alternate label for an existing concept.
    ///
    /// The first concept registered for a label keeps it.
    ///
    /// # Errors
    /// Returns [`VocabularyError::UnknownConcept`] when `concept_id` has not
    /// been added.
    pub fn alternate_label(
        mut self,
        label: &str,
        concept_id: &str,
    ) -> Result<Self, VocabularyError> {
        self.add_alternate_label(label, concept_id)?;
        Ok(self)
    }

    /// Register an alternate label in place, leaving the builder usable when
    /// the concept is unknown.
    ///
    /// # Errors
    /// Returns [`VocabularyError::UnknownConcept`] when `concept_id` has not
    /// been added.
    pub fn add_alternate_label(
        &mut self,
        label: &str,
        concept_id: &str,
    ) -> Result<(), VocabularyError> {
        if !self.vocabulary.concepts.contains_key(concept_id) {
            return Err(VocabularyError::UnknownConcept {
                label: label.to_owned(),
                concept_id: concept_id.to_owned(),
            });
        }
        self.vocabulary
            .alternate
            .entry(fold_label(label))
            .or_insert_with(|| concept_id.to_owned());
        Ok(())
    }

    /// Finish the vocabulary.
    #[must_use]
    pub fn build(self) -> ConceptVocabulary {
        self.vocabulary
    }
}

fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Which label table produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// The concept's own label.
    Primary,
    /// A label collected from concept lists.
    Alternate,
}

/// A meaning matched to a concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptMatch {
    /// Id of the matched concept.
    pub concept_id: String,
    /// The concept's primary label.
    pub label: String,
    /// The table the match came from.
    pub source: MatchSource,
}

/// One atomic meaning with its optional concept link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMeaning {
    /// Display text of the meaning as written in the description.
    pub text: String,
    /// Concept link, when the meaning is part of the vocabulary.
    pub concept: Option<ConceptMatch>,
}

/// Resolves meanings against a borrowed [`ConceptVocabulary`].
///
/// # Examples
/// ```
/// use dictionaria_core::meaning::{ConceptVocabulary, MeaningResolver, has_comparison_meaning};
///
/// let vocabulary = ConceptVocabulary::builder()
///     .concept("2009", "dog", None)
///     .build();
/// let resolver = MeaningResolver::new(&vocabulary);
///
/// let meanings = resolver.resolve_description("Dog ; hound");
/// assert_eq!(meanings[0].concept.as_ref().map(|c| c.concept_id.as_str()), Some("2009"));
/// assert!(meanings[1].concept.is_none());
/// assert!(has_comparison_meaning(&meanings));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MeaningResolver<'v> {
    vocabulary: &'v ConceptVocabulary,
}

impl<'v> MeaningResolver<'v> {
    /// Create a resolver over `vocabulary`.
    #[must_use]
    pub const fn new(vocabulary: &'v ConceptVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Resolve one atomic meaning, trying primary labels then alternates.
    #[must_use]
    pub fn resolve(&self, meaning: &str) -> Option<ConceptMatch> {
        let folded = fold_label(meaning);
        if folded.is_empty() {
            return None;
        }
        let (concept, source) = self
            .vocabulary
            .primary_concept(&folded)
            .map(|concept| (concept, MatchSource::Primary))
            .or_else(|| {
                self.vocabulary
                    .alternate_concept(&folded)
                    .map(|concept| (concept, MatchSource::Alternate))
            })?;
        Some(ConceptMatch {
            concept_id: concept.id.clone(),
            label: concept.label.clone(),
            source,
        })
    }

    /// Split and resolve a whole sense description, preserving order.
    #[must_use]
    pub fn resolve_description(&self, description: &str) -> Vec<ResolvedMeaning> {
        split_meanings(description)
            .into_iter()
            .map(|text| {
                let concept = self.resolve(&text);
                ResolvedMeaning { text, concept }
            })
            .collect()
    }
}

/// Whether at least one meaning resolved to a concept.
#[must_use]
pub fn has_comparison_meaning(meanings: &[ResolvedMeaning]) -> bool {
    meanings.iter().any(|meaning| meaning.concept.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vocabulary() -> ConceptVocabulary {
        ConceptVocabulary::builder()
            .concept("2009", "DOG", Some("domesticated canine".into()))
            .concept("1227", "water", None)
            .alternate_label("hound", "2009")
            .and_then(|builder| builder.alternate_label("Water (drinking)", "1227"))
            .expect("known concepts")
            .build()
    }

    #[rstest]
    #[case("dog ; domestic dog ; canine", &["dog", "domestic dog", "canine"])]
    #[case("dog ;; cat", &["dog", "cat"])]
    #[case("  ;  ", &[])]
    #[case("single", &["single"])]
    fn splits_descriptions(#[case] description: &str, #[case] expected: &[&str]) {
        assert_eq!(split_meanings(description), expected);
    }

    #[rstest]
    fn resolves_primary_labels_case_insensitively(vocabulary: ConceptVocabulary) {
        let resolver = MeaningResolver::new(&vocabulary);
        let matched = resolver.resolve(" Dog ").expect("primary label");
        assert_eq!(matched.concept_id, "2009");
        assert_eq!(matched.label, "dog");
        assert_eq!(matched.source, MatchSource::Primary);
    }

    #[rstest]
    fn falls_back_to_alternate_labels(vocabulary: ConceptVocabulary) {
        let resolver = MeaningResolver::new(&vocabulary);
        let matched = resolver.resolve("HOUND").expect("alternate label");
        assert_eq!(matched.concept_id, "2009");
        assert_eq!(matched.source, MatchSource::Alternate);
    }

    #[rstest]
    fn unmatched_meanings_stay_unresolved(vocabulary: ConceptVocabulary) {
        let resolver = MeaningResolver::new(&vocabulary);
        let meanings = resolver.resolve_description("puppy ; young dog");
        assert_eq!(meanings.len(), 2);
        assert!(meanings.iter().all(|m| m.concept.is_none()));
        assert!(!has_comparison_meaning(&meanings));
        assert_eq!(meanings[1].text, "young dog");
    }

    #[rstest]
    fn primary_label_wins_over_alternate() {
        let vocabulary = ConceptVocabulary::builder()
            .concept("1", "stone", None)
            .concept("2", "rock", None)
            .alternate_label("stone", "2")
            .expect("known concept")
            .build();
        let resolver = MeaningResolver::new(&vocabulary);
        assert_eq!(
            resolver.resolve("stone").map(|m| m.concept_id),
            Some("1".to_owned())
        );
    }

    #[rstest]
    fn replacing_a_concept_releases_its_old_label() {
        let vocabulary = ConceptVocabulary::builder()
            .concept("1", "dog", None)
            .concept("1", "hound", None)
            .build();
        let resolver = MeaningResolver::new(&vocabulary);
        assert_eq!(resolver.resolve("dog"), None);
        assert_eq!(
            resolver.resolve("hound").map(|m| m.label),
            Some("hound".to_owned())
        );
        assert_eq!(vocabulary.len(), 1);
    }

    #[rstest]
    fn replacing_a_concept_keeps_a_label_taken_over_by_another() {
        let vocabulary = ConceptVocabulary::builder()
            .concept("1", "dog", None)
            .concept("2", "dog", None)
            .concept("1", "hound", None)
            .build();
        let resolver = MeaningResolver::new(&vocabulary);
        assert_eq!(
            resolver.resolve("dog").map(|m| m.concept_id),
            Some("2".to_owned())
        );
    }

    #[rstest]
    fn first_alternate_label_is_kept(vocabulary: ConceptVocabulary) {
        let extended = ConceptVocabularyBuilder { vocabulary }
            .alternate_label("hound", "1227")
            .expect("known concept")
            .build();
        let resolver = MeaningResolver::new(&extended);
        assert_eq!(
            resolver.resolve("hound").map(|m| m.concept_id),
            Some("2009".to_owned())
        );
    }

    #[rstest]
    fn rejects_alternate_labels_for_unknown_concepts() {
        let err = ConceptVocabulary::builder()
            .alternate_label("cur", "9999")
            .expect_err("unknown concept");
        assert_eq!(
            err,
            VocabularyError::UnknownConcept {
                label: "cur".into(),
                concept_id: "9999".into()
            }
        );
    }

    #[rstest]
    fn builder_stays_usable_after_an_unknown_concept() {
        let mut builder = ConceptVocabulary::builder().concept("2009", "dog", None);
        let err = builder
            .add_alternate_label("cur", "9999")
            .expect_err("unknown concept");
        assert!(matches!(err, VocabularyError::UnknownConcept { .. }));
        builder
            .add_alternate_label("hound", "2009")
            .expect("known concept");
        let vocabulary = builder.build();
        let resolver = MeaningResolver::new(&vocabulary);
        assert_eq!(
            resolver.resolve("hound").map(|m| m.concept_id),
            Some("2009".to_owned())
        );
    }

    #[rstest]
    fn exposes_concepts(vocabulary: ConceptVocabulary) {
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(
            vocabulary
                .concept("2009")
                .and_then(|c| c.definition.as_deref()),
            Some("domesticated canine")
        );
        let ids: Vec<_> = vocabulary.concepts().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1227", "2009"]);
    }
}

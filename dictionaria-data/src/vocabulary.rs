//! Loading the concept vocabulary from CSV exports of a concept list.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{ConceptVocabulary, meaning::VocabularyError};
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

/// File listing concepts (`ID`, `GLOSS`, `DEFINITION`).
pub const CONCEPTS_FILE: &str = "concepts.csv";
/// Optional file listing alternate labels (`LABEL`, `CONCEPT_ID`).
pub const ALT_LABELS_FILE: &str = "alt_labels.csv";

/// Errors raised while loading a vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyLoadError {
    #[error("failed to read vocabulary file {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed vocabulary file {path}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

#[derive(Debug, Deserialize)]
struct ConceptRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "GLOSS")]
    gloss: String,
    #[serde(rename = "DEFINITION", default)]
    definition: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AltLabelRow {
    #[serde(rename = "LABEL")]
    label: String,
    #[serde(rename = "CONCEPT_ID")]
    concept_id: String,
}

fn read_rows<T>(path: &Utf8Path) -> Result<Vec<T>, VocabularyLoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let contents =
        dictionaria_fs::read_to_string(path).map_err(|source| VocabularyLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes())
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| VocabularyLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the vocabulary stored in `dir`.
///
/// Alternate labels naming unknown concepts are skipped with a warning.
pub fn load_vocabulary(dir: &Utf8Path) -> Result<ConceptVocabulary, VocabularyLoadError> {
    let concepts: Vec<ConceptRow> = read_rows(&dir.join(CONCEPTS_FILE))?;
    let mut builder = ConceptVocabulary::builder();
    for row in concepts {
        let definition = row.definition.filter(|value| !value.is_empty());
        builder = builder.concept(row.id, &row.gloss, definition);
    }

    let alt_labels = dir.join(ALT_LABELS_FILE);
    let has_alt_labels =
        dictionaria_fs::file_is_file(&alt_labels).map_err(|source| VocabularyLoadError::Read {
            path: alt_labels.clone(),
            source,
        })?;
    if has_alt_labels {
        for row in read_rows::<AltLabelRow>(&alt_labels)? {
            match builder.add_alternate_label(&row.label, &row.concept_id) {
                Ok(()) => {}
                Err(VocabularyError::UnknownConcept { label, concept_id }) => {
                    warn!("skipping alternate label {label:?} for unknown concept {concept_id}");
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    let vocabulary = builder.build();
    info!("loaded {} concepts", vocabulary.len());
    Ok(vocabulary)
}

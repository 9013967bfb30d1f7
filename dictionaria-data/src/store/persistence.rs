use camino::{Utf8Path, Utf8PathBuf};
use dictionaria_core::{ConceptVocabulary, Dictionary, DictionaryStore, SubmissionGraph};
use log::debug;
use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

use super::schema::{StoreSchemaError, initialise_schema};

/// Dictionary store backed by an SQLite database.
///
/// Every write runs in its own transaction. Persisting a submission first
/// removes whatever an earlier run stored for the same dictionary, so
/// reloading yields the same rows.
///
/// # Examples
/// ```
/// use dictionaria_core::{ConceptVocabulary, DictionaryStore};
/// use dictionaria_data::store::SqliteDictionaryStore;
///
/// let mut store = SqliteDictionaryStore::open_in_memory().expect("open store");
/// let vocabulary = ConceptVocabulary::builder().concept("2009", "dog", None).build();
/// store.persist_vocabulary(&vocabulary).expect("persist vocabulary");
///
/// let label: String = store
///     .connection()
///     .query_row("SELECT label FROM concepts WHERE id = '2009'", [], |row| row.get(0))
///     .expect("read concept");
/// assert_eq!(label, "dog");
/// ```
#[derive(Debug)]
pub struct SqliteDictionaryStore {
    connection: Connection,
}

impl SqliteDictionaryStore {
    /// Open (or create) the database at `path` and initialise its schema.
    pub fn open(path: &Utf8Path) -> Result<Self, PersistError> {
        dictionaria_fs::ensure_parent_dir(path).map_err(|source| PersistError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
        let connection = Connection::open(path).map_err(|source| PersistError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, PersistError> {
        let connection = Connection::open_in_memory().map_err(|source| PersistError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection, initialising the schema.
    pub fn from_connection(mut connection: Connection) -> Result<Self, PersistError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// The underlying connection, for queries.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn sqlite(operation: &'static str) -> impl FnOnce(SqliteError) -> PersistError {
    move |source| PersistError::Sqlite { operation, source }
}

fn ordinal(value: usize) -> Result<i64, PersistError> {
    i64::try_from(value).map_err(|_| PersistError::OrdinalOutOfRange { ordinal: value })
}

impl DictionaryStore for SqliteDictionaryStore {
    type Error = PersistError;

    fn persist_vocabulary(&mut self, vocabulary: &ConceptVocabulary) -> Result<(), Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite("begin vocabulary transaction"))?;
        {
            let mut upsert = transaction
                .prepare_cached(
                    "INSERT INTO concepts (id, label, definition) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        label = excluded.label,
                        definition = excluded.definition",
                )
                .map_err(sqlite("prepare upsert concept"))?;
            for concept in vocabulary.concepts() {
                upsert
                    .execute((&concept.id, &concept.label, &concept.definition))
                    .map_err(sqlite("upsert concept"))?;
            }
        }
        transaction
            .commit()
            .map_err(sqlite("commit vocabulary transaction"))?;
        debug!("persisted {} concepts", vocabulary.len());
        Ok(())
    }

    fn persist_submission(
        &mut self,
        dictionary: &Dictionary,
        graph: &SubmissionGraph,
    ) -> Result<(), Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite("begin submission transaction"))?;
        write_dictionary(&transaction, dictionary)?;
        write_sentences(&transaction, &dictionary.id, graph)?;
        write_words(&transaction, &dictionary.id, graph)?;
        write_meanings(&transaction, graph)?;
        write_value_sets(&transaction, &dictionary.id, graph)?;
        transaction
            .commit()
            .map_err(sqlite("commit submission transaction"))
    }
}

fn write_dictionary(
    transaction: &Transaction<'_>,
    dictionary: &Dictionary,
) -> Result<(), PersistError> {
    transaction
        .execute("DELETE FROM dictionaries WHERE id = ?1", [&dictionary.id])
        .map_err(sqlite("remove previous dictionary"))?;
    transaction
        .execute(
            "INSERT INTO languages (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            (&dictionary.language.id, &dictionary.language.name),
        )
        .map_err(sqlite("upsert language"))?;
    let custom_fields = serde_json::to_string(&dictionary.custom_fields)
        .map_err(|source| PersistError::Encode { source })?;
    transaction
        .execute(
            "INSERT INTO dictionaries (id, name, description, language_id, published, custom_fields)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &dictionary.id,
                &dictionary.name,
                &dictionary.description,
                &dictionary.language.id,
                &dictionary.published,
                &custom_fields,
            ),
        )
        .map_err(sqlite("insert dictionary"))?;

    let mut upsert_contributor = transaction
        .prepare_cached(
            "INSERT INTO contributors (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .map_err(sqlite("prepare upsert contributor"))?;
    let mut link_contributor = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO dictionary_contributors (dictionary_id, contributor_id, ordinal)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(sqlite("prepare link contributor"))?;
    for (index, contributor) in dictionary.contributors.iter().enumerate() {
        upsert_contributor
            .execute((&contributor.id, &contributor.name))
            .map_err(sqlite("upsert contributor"))?;
        link_contributor
            .execute((&dictionary.id, &contributor.id, ordinal(index + 1)?))
            .map_err(sqlite("link contributor"))?;
    }
    Ok(())
}

fn write_sentences(
    transaction: &Transaction<'_>,
    dictionary_id: &str,
    graph: &SubmissionGraph,
) -> Result<(), PersistError> {
    let mut insert = transaction
        .prepare_cached(
            "INSERT OR REPLACE INTO sentences (
                id, dictionary_id, text, analyzed, gloss, translation, corpus_ref, sound_file
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(sqlite("prepare insert sentence"))?;
    for sentence in graph.sentences() {
        insert
            .execute((
                &sentence.id,
                dictionary_id,
                &sentence.text,
                &sentence.analyzed,
                &sentence.gloss,
                &sentence.translation,
                &sentence.corpus_ref,
                &sentence.sound_file,
            ))
            .map_err(sqlite("insert sentence"))?;
    }
    Ok(())
}

fn write_words(
    transaction: &Transaction<'_>,
    dictionary_id: &str,
    graph: &SubmissionGraph,
) -> Result<(), PersistError> {
    let mut insert_word = transaction
        .prepare_cached(
            "INSERT INTO words (id, dictionary_id, headword, part_of_speech)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert word"))?;
    let mut insert_media = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO word_media (word_id, ordinal, kind, name) VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert media"))?;
    let mut insert_metadata = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO word_metadata (word_id, ordinal, key, value) VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert metadata"))?;
    let mut insert_cross_reference = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO cross_references (source_word_id, target_word_id, relation)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(sqlite("prepare insert cross-reference"))?;

    for word in graph.words() {
        insert_word
            .execute((&word.id, dictionary_id, &word.headword, &word.part_of_speech))
            .map_err(sqlite("insert word"))?;
        for (index, media) in word.media.iter().enumerate() {
            insert_media
                .execute((&word.id, ordinal(index)?, media.kind.as_str(), &media.name))
                .map_err(sqlite("insert media"))?;
        }
        for pair in &word.metadata {
            insert_metadata
                .execute((&word.id, ordinal(pair.ordinal)?, &pair.key, &pair.value))
                .map_err(sqlite("insert metadata"))?;
        }
    }
    for link in graph.cross_references() {
        insert_cross_reference
            .execute((
                &link.source_word_id,
                &link.target_word_id,
                link.relation.as_deref().unwrap_or_default(),
            ))
            .map_err(sqlite("insert cross-reference"))?;
    }
    Ok(())
}

fn write_meanings(
    transaction: &Transaction<'_>,
    graph: &SubmissionGraph,
) -> Result<(), PersistError> {
    let mut insert_meaning = transaction
        .prepare_cached(
            "INSERT OR REPLACE INTO meanings (id, word_id, description, semantic_domain, has_comparison_meaning)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sqlite("prepare insert meaning"))?;
    let mut link_sentence = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO meaning_sentences (meaning_id, sentence_id, ordinal)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(sqlite("prepare link sentence"))?;
    for meaning in graph.meanings() {
        insert_meaning
            .execute((
                &meaning.id,
                &meaning.word_id,
                &meaning.description,
                &meaning.semantic_domain,
                meaning.has_comparison_meaning,
            ))
            .map_err(sqlite("insert meaning"))?;
        for (index, sentence_id) in meaning.example_ids.iter().enumerate() {
            link_sentence
                .execute((&meaning.id, sentence_id, ordinal(index)?))
                .map_err(sqlite("link sentence"))?;
        }
    }
    Ok(())
}

fn write_value_sets(
    transaction: &Transaction<'_>,
    dictionary_id: &str,
    graph: &SubmissionGraph,
) -> Result<(), PersistError> {
    let mut insert_value_set = transaction
        .prepare_cached(
            "INSERT INTO value_sets (id, dictionary_id, concept_id, language_id)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert value set"))?;
    let mut insert_counterpart = transaction
        .prepare_cached(
            "INSERT INTO counterparts (id, value_set_id, word_id, name) VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert counterpart"))?;
    for value_set in graph.value_sets() {
        insert_value_set
            .execute((
                &value_set.id,
                dictionary_id,
                &value_set.concept_id,
                &value_set.language_id,
            ))
            .map_err(sqlite("insert value set"))?;
    }
    for counterpart in graph.counterparts() {
        insert_counterpart
            .execute((
                &counterpart.id,
                &counterpart.value_set_id,
                &counterpart.word_id,
                &counterpart.name,
            ))
            .map_err(sqlite("insert counterpart"))?;
    }
    Ok(())
}

/// Errors raised when persisting dictionaries.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create the parent directory of {path}")]
    CreateDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open SQLite database at {path}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: SqliteError,
    },
    #[error(transparent)]
    Schema(#[from] StoreSchemaError),
    #[error("failed to encode dictionary properties")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("ordinal {ordinal} exceeds SQLite i64 range")]
    OrdinalOutOfRange { ordinal: usize },
    #[error("failed to persist {operation}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: SqliteError,
    },
}

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `schema_version`.
pub const SCHEMA_VERSION: i64 = 2;

const TABLES: &[(&str, &str)] = &[
    (
        "create concepts",
        "CREATE TABLE IF NOT EXISTS concepts (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0),
            label TEXT NOT NULL,
            definition TEXT
        ) WITHOUT ROWID",
    ),
    (
        "create languages",
        "CREATE TABLE IF NOT EXISTS languages (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        ) WITHOUT ROWID",
    ),
    (
        "create contributors",
        "CREATE TABLE IF NOT EXISTS contributors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        ) WITHOUT ROWID",
    ),
    (
        "create dictionaries",
        "CREATE TABLE IF NOT EXISTS dictionaries (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            language_id TEXT NOT NULL REFERENCES languages(id),
            published TEXT,
            custom_fields TEXT NOT NULL
        ) WITHOUT ROWID",
    ),
    (
        "create dictionary_contributors",
        "CREATE TABLE IF NOT EXISTS dictionary_contributors (
            dictionary_id TEXT NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
            contributor_id TEXT NOT NULL REFERENCES contributors(id),
            ordinal INTEGER NOT NULL,
            PRIMARY KEY (dictionary_id, contributor_id)
        ) WITHOUT ROWID",
    ),
    (
        "create sentences",
        "CREATE TABLE IF NOT EXISTS sentences (
            id TEXT PRIMARY KEY,
            dictionary_id TEXT NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
            text TEXT,
            analyzed TEXT,
            gloss TEXT,
            translation TEXT,
            corpus_ref TEXT,
            sound_file TEXT
        ) WITHOUT ROWID",
    ),
    (
        "create words",
        "CREATE TABLE IF NOT EXISTS words (
            id TEXT PRIMARY KEY,
            dictionary_id TEXT NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
            headword TEXT NOT NULL,
            part_of_speech TEXT
        ) WITHOUT ROWID",
    ),
    (
        "create word_media",
        "CREATE TABLE IF NOT EXISTS word_media (
            word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            ordinal INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('picture', 'audio')),
            name TEXT NOT NULL,
            PRIMARY KEY (word_id, ordinal)
        ) WITHOUT ROWID",
    ),
    (
        "create word_metadata",
        "CREATE TABLE IF NOT EXISTS word_metadata (
            word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            ordinal INTEGER NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (word_id, ordinal)
        ) WITHOUT ROWID",
    ),
    (
        "create meanings",
        "CREATE TABLE IF NOT EXISTS meanings (
            id TEXT PRIMARY KEY,
            word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            semantic_domain TEXT,
            has_comparison_meaning INTEGER NOT NULL
        ) WITHOUT ROWID",
    ),
    (
        "create meaning_sentences",
        "CREATE TABLE IF NOT EXISTS meaning_sentences (
            meaning_id TEXT NOT NULL REFERENCES meanings(id) ON DELETE CASCADE,
            sentence_id TEXT NOT NULL REFERENCES sentences(id) ON DELETE CASCADE,
            ordinal INTEGER NOT NULL,
            PRIMARY KEY (meaning_id, sentence_id)
        ) WITHOUT ROWID",
    ),
    (
        "create cross_references",
        "CREATE TABLE IF NOT EXISTS cross_references (
            source_word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            target_word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            relation TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (source_word_id, target_word_id, relation)
        ) WITHOUT ROWID",
    ),
    (
        "create value_sets",
        "CREATE TABLE IF NOT EXISTS value_sets (
            id TEXT PRIMARY KEY,
            dictionary_id TEXT NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
            concept_id TEXT NOT NULL REFERENCES concepts(id),
            language_id TEXT NOT NULL REFERENCES languages(id)
        ) WITHOUT ROWID",
    ),
    (
        "create counterparts",
        "CREATE TABLE IF NOT EXISTS counterparts (
            id TEXT PRIMARY KEY,
            value_set_id TEXT NOT NULL REFERENCES value_sets(id) ON DELETE CASCADE,
            word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            name TEXT NOT NULL
        ) WITHOUT ROWID",
    ),
];

const INDEXES: &[(&str, &str)] = &[
    (
        "index words by dictionary",
        "CREATE INDEX IF NOT EXISTS idx_words_dictionary ON words(dictionary_id)",
    ),
    (
        "index meanings by word",
        "CREATE INDEX IF NOT EXISTS idx_meanings_word ON meanings(word_id)",
    ),
    (
        "index value sets by concept",
        "CREATE INDEX IF NOT EXISTS idx_value_sets_concept ON value_sets(concept_id)",
    ),
];

/// Initialise the dictionary schema inside an SQLite database.
///
/// Foreign keys are enabled, tables and indexes are created when missing and
/// the schema version is recorded. A database carrying a different version
/// is rejected.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use dictionaria_data::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("schema creation is idempotent");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 2);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), StoreSchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| StoreSchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| StoreSchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    for &(step, sql) in TABLES.iter().chain(INDEXES) {
        run_migration_step(&transaction, step, sql)?;
    }
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| StoreSchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), StoreSchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|source| StoreSchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(StoreSchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| StoreSchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), StoreSchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| StoreSchemaError::Migration { step, source })
}

/// Errors raised when initialising the dictionary schema.
#[derive(Debug, Error)]
pub enum StoreSchemaError {
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        #[source]
        source: SqliteError,
    },
    #[error("failed to execute migration step '{step}'")]
    Migration {
        step: &'static str,
        #[source]
        source: SqliteError,
    },
    #[error(
        "expected dictionary schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch { expected: i64, found: i64 },
}

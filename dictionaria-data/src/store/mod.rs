//! SQLite implementation of the dictionary store.
//!
//! The module is split into two focused submodules:
//! - [`schema`] materialises the tables backing the dictionary journal.
//! - [`persistence`] writes vocabularies and submission graphs into them.

mod persistence;
mod schema;

pub use persistence::{PersistError, SqliteDictionaryStore};
pub use schema::{SCHEMA_VERSION, StoreSchemaError, initialise_schema};

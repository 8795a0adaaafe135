//! Persistence backend implementations.

mod sqlite;

pub use sqlite::SqliteStore;

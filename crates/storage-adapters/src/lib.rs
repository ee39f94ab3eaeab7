//! Storage adapters for FilmSay.
//!
//! Implements the `domains` store ports against a relational database.
//! The SQLite backend (feature `db-sqlite`, default) is the only one
//! currently built.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;

//! study-storage - Storage library for study-tracker
//!
//! This crate provides the SQLite implementation of the subject store.

mod sqlite_store;

pub use sqlite_store::{SqliteStore, DEFAULT_DATABASE_FILE};

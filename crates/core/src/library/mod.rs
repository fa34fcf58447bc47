//! Book library - the relational store the yearly snapshots merge into.
//!
//! A work is identified by its (title, author) pair. Re-publications of the
//! same work across snapshots collapse into one row whose `instances` counter
//! grows with every occurrence, a cheap popularity proxy.

mod sqlite;
mod types;

pub use sqlite::SqliteLibrary;
pub use types::*;

use crate::snapshot::NewBook;

/// Trait for the book library storage.
pub trait Library: Send + Sync {
    /// Insert a book or merge it into an existing (title, author) row.
    ///
    /// On conflict the stored row keeps all its attributes except that
    /// `instances` is incremented and `year` becomes the minimum of the
    /// stored and incoming years (first-write-wins for everything else).
    /// This makes repeated upserts commutative: snapshot order never
    /// changes the merged result.
    ///
    /// Returns the row id whether the book was inserted or merged.
    fn upsert_book(&self, book: &NewBook, year: i32) -> Result<i64, LibraryError>;

    /// Insert-or-fetch a genre by name. Never creates a duplicate.
    fn upsert_genre(&self, name: &str) -> Result<i64, LibraryError>;

    /// Associate a book with a genre. A no-op if the link already exists.
    fn link_book_genre(&self, book_id: i64, genre_id: i64) -> Result<(), LibraryError>;

    /// Merge one snapshot file's records as a single transaction.
    ///
    /// Every record is applied fully (book, genres, links) or the whole
    /// snapshot rolls back; the commit happens once per file.
    fn merge_snapshot(&self, books: &[NewBook], year: i32)
        -> Result<SnapshotOutcome, LibraryError>;

    /// Get a stored book by its (title, author) pair.
    fn get(&self, title: &str, author: &str) -> Result<StoredBook, LibraryError>;

    /// Genre names linked to a book, sorted by name.
    fn genres_of(&self, book_id: i64) -> Result<Vec<String>, LibraryError>;

    /// Row counts across the three tables.
    fn stats(&self) -> Result<LibraryStats, LibraryError>;

    /// Remove a book; its genre links go with it.
    fn remove(&self, title: &str, author: &str) -> Result<(), LibraryError>;

    /// Clear all stored data.
    fn clear(&self) -> Result<(), LibraryError>;
}

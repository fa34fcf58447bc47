//! Types for the book library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A book row as stored in the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBook {
    /// Row id.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Free-text author lifespan, e.g. "1920-1990".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_span: Option<String>,
    /// Earliest publication year seen across all merged snapshots.
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<i64>,
    /// Compact cover identifier derived from the Goodreads image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_url: Option<String>,
    /// Number of snapshot occurrences merged into this row.
    pub instances: i64,
}

/// Counts for one merged snapshot file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOutcome {
    /// Books inserted for the first time.
    pub books_new: u32,
    /// Books merged into an existing row.
    pub books_merged: u32,
}

/// Library row counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LibraryStats {
    pub books: u64,
    pub genres: u64,
    pub links: u64,
}

/// Errors for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

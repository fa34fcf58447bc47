//! Snapshot ingestion - walks a directory tree of yearly snapshot files and
//! merges every surviving record into the library, committing once per file.

mod runner;
mod types;

pub use runner::Importer;
pub use types::ImportSummary;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read snapshot directory {dir}: {source}")]
    Walk {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Library error: {0}")]
    Library(#[from] crate::library::LibraryError),
}

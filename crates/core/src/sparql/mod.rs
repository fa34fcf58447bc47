//! Libris SPARQL client used to cross-check the harvested snapshots against
//! the live bibliographic endpoint.

mod client;
mod types;

pub use client::{build_query, SparqlClient, DEFAULT_QUERY};
pub use types::*;

use thiserror::Error;

/// Errors for the SPARQL verification client.
#[derive(Debug, Error)]
pub enum SparqlError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned a non-success status.
    #[error("Endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the results document.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The result set did not match the known-good expectations.
    #[error("Verification failed: {0}")]
    Verification(String),
}

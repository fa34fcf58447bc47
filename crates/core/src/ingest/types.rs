use serde::{Deserialize, Serialize};

/// Totals for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Snapshot files merged and committed.
    pub files_imported: u32,
    /// Files skipped over (unreadable, bad JSON, non-year name, store failure).
    pub files_failed: u32,
    /// Books inserted for the first time.
    pub books_new: u32,
    /// Occurrences merged into an existing book row.
    pub books_merged: u32,
    /// Records dropped by the living-author heuristic.
    pub records_skipped_living: u32,
    /// Records dropped because they did not parse.
    pub records_skipped_invalid: u32,
}

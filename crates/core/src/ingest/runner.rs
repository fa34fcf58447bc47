use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ImportSummary, IngestError};
use crate::library::Library;
use crate::snapshot::{presumed_living, NewBook, RawBook};

/// Walks a snapshot directory and feeds every file through the library.
///
/// Each file's base name is the publication year for all records inside it.
/// Files are independent: a failure in one is logged and counted, never
/// aborting the run, and previously committed files stay committed.
pub struct Importer<'a> {
    library: &'a dyn Library,
    current_year: i32,
}

impl<'a> Importer<'a> {
    pub fn new(library: &'a dyn Library) -> Self {
        Self {
            library,
            current_year: Utc::now().year(),
        }
    }

    /// Override the calendar year the living-author heuristic compares against.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Ingest every snapshot file under `dir`.
    pub fn run(&self, dir: &Path) -> Result<ImportSummary, IngestError> {
        let mut files = Vec::new();
        collect_snapshots(dir, &mut files).map_err(|e| IngestError::Walk {
            dir: dir.display().to_string(),
            source: e,
        })?;
        // Sorted for deterministic logs only; the merge policy is
        // order-independent so correctness never depends on this.
        files.sort();

        info!("Found {} snapshot files under {:?}", files.len(), dir);

        let mut summary = ImportSummary::default();
        for path in &files {
            match self.ingest_file(path, &mut summary) {
                Ok(()) => summary.files_imported += 1,
                Err(reason) => {
                    warn!("Skipping snapshot {:?}: {}", path, reason);
                    summary.files_failed += 1;
                }
            }
        }

        info!(
            "Import finished: {} files ({} failed), {} new books, {} merged occurrences, \
             {} living-author records skipped, {} invalid records skipped",
            summary.files_imported,
            summary.files_failed,
            summary.books_new,
            summary.books_merged,
            summary.records_skipped_living,
            summary.records_skipped_invalid,
        );

        Ok(summary)
    }

    fn ingest_file(&self, path: &Path, summary: &mut ImportSummary) -> Result<(), String> {
        let year = snapshot_year(path).ok_or("file name is not a year")?;

        let data = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let values: Vec<Value> =
            serde_json::from_str(&data).map_err(|e| format!("not a JSON array: {e}"))?;

        let mut books = Vec::with_capacity(values.len());
        for value in values {
            let raw: RawBook = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Malformed record in {:?}: {}", path, e);
                    summary.records_skipped_invalid += 1;
                    continue;
                }
            };

            if presumed_living(raw.life_span.as_deref(), self.current_year) {
                debug!(
                    "Skipping '{}' by {}: author presumed living ({:?})",
                    raw.title, raw.author, raw.life_span
                );
                summary.records_skipped_living += 1;
                continue;
            }

            books.push(NewBook::from(raw));
        }

        let outcome = self
            .library
            .merge_snapshot(&books, year)
            .map_err(|e| e.to_string())?;

        info!(
            "Merged {:?}: {} new, {} merged (year {})",
            path.file_name().unwrap_or_default(),
            outcome.books_new,
            outcome.books_merged,
            year
        );
        summary.books_new += outcome.books_new;
        summary.books_merged += outcome.books_merged;
        Ok(())
    }
}

/// The snapshot's declared year is its file stem, e.g. `1956.json` -> 1956.
fn snapshot_year(path: &Path) -> Option<i32> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn collect_snapshots(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_snapshots(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::SqliteLibrary;
    use std::fs;
    use tempfile::TempDir;

    fn write_snapshot(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_snapshot_year() {
        assert_eq!(snapshot_year(Path::new("json/1956.json")), Some(1956));
        assert_eq!(snapshot_year(Path::new("json/notes.json")), None);
    }

    #[test]
    fn test_two_snapshots_merge_into_one_book() {
        let dir = TempDir::new().unwrap();
        write_snapshot(
            dir.path(),
            "1950.json",
            r#"[{"title": "Example", "author": "Jane Doe", "genres": ["Fiction"]}]"#,
        );
        write_snapshot(
            dir.path(),
            "1930.json",
            r#"[{"title": "Example", "author": "Jane Doe", "genres": ["Fiction", "Drama"]}]"#,
        );

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.files_imported, 2);
        assert_eq!(summary.books_new, 1);
        assert_eq!(summary.books_merged, 1);

        let stored = library.get("Example", "Jane Doe").unwrap();
        assert_eq!(stored.year, 1930);
        assert_eq!(stored.instances, 2);

        let genres = library.genres_of(stored.id).unwrap();
        assert_eq!(genres, vec!["Drama", "Fiction"]);

        let stats = library.stats().unwrap();
        assert_eq!(stats.books, 1);
        assert_eq!(stats.genres, 2);
    }

    #[test]
    fn test_living_author_record_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_snapshot(
            dir.path(),
            "1980.json",
            r#"[
                {"title": "Ny bok", "author": "Ung Författare", "lifeSpan": "1950", "genres": ["Fiction"]},
                {"title": "Gammal bok", "author": "Död Författare", "lifeSpan": "1850-1920", "genres": ["Fiction"]}
            ]"#,
        );

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.records_skipped_living, 1);
        assert_eq!(summary.books_new, 1);
        assert!(library.get("Ny bok", "Ung Författare").is_err());
        assert!(library.get("Gammal bok", "Död Författare").is_ok());
    }

    #[test]
    fn test_malformed_record_does_not_sink_the_file() {
        let dir = TempDir::new().unwrap();
        write_snapshot(
            dir.path(),
            "1900.json",
            r#"[
                {"author": "No Title", "genres": []},
                {"title": "Giltig", "author": "Någon", "genres": ["Fiction"]}
            ]"#,
        );

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.files_imported, 1);
        assert_eq!(summary.records_skipped_invalid, 1);
        assert_eq!(summary.books_new, 1);
    }

    #[test]
    fn test_bad_file_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        write_snapshot(dir.path(), "1910.json", "this is not json");
        write_snapshot(
            dir.path(),
            "1920.json",
            r#"[{"title": "Kvar", "author": "Någon", "genres": []}]"#,
        );

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.files_imported, 1);
        assert!(library.get("Kvar", "Någon").is_ok());
    }

    #[test]
    fn test_non_year_file_name_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_snapshot(dir.path(), "readme.json", "[]");

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.files_imported, 0);
    }

    #[test]
    fn test_walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        write_snapshot(
            &nested,
            "1905.json",
            r#"[{"title": "Djupt nere", "author": "Någon", "genres": []}]"#,
        );
        // Non-JSON files are ignored entirely
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        let summary = importer.run(dir.path()).unwrap();

        assert_eq!(summary.files_imported, 1);
        assert_eq!(summary.files_failed, 0);
        assert!(library.get("Djupt nere", "Någon").is_ok());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library);
        let result = importer.run(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(IngestError::Walk { .. })));
    }

    #[test]
    fn test_rerun_grows_instance_count_only() {
        let dir = TempDir::new().unwrap();
        write_snapshot(
            dir.path(),
            "1940.json",
            r#"[{"title": "Kallocain", "author": "Karin Boye", "genres": ["Dystopia"]}]"#,
        );

        let library = SqliteLibrary::in_memory().unwrap();
        let importer = Importer::new(&library).with_current_year(2024);
        importer.run(dir.path()).unwrap();
        importer.run(dir.path()).unwrap();

        let stored = library.get("Kallocain", "Karin Boye").unwrap();
        assert_eq!(stored.year, 1940);
        assert_eq!(stored.instances, 2);

        let stats = library.stats().unwrap();
        assert_eq!(stats.books, 1);
        assert_eq!(stats.genres, 1);
        assert_eq!(stats.links, 1);
    }
}

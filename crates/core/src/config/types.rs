use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub sparql: SparqlConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("books.db")
}

/// Snapshot import configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Directory tree of yearly snapshot files (one JSON array per year).
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("json")
}

/// Libris SPARQL endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SparqlConfig {
    /// SPARQL endpoint URL.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional path to a query template overriding the bundled one.
    /// The template must contain a single `|YEAR|` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_path: Option<PathBuf>,
    /// Expected results for the known-year verification run.
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            timeout_secs: default_timeout_secs(),
            query_path: None,
            verification: VerificationConfig::default(),
        }
    }
}

fn default_endpoint_url() -> String {
    "https://libris.kb.se/sparql".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Known-good expectations asserted by `bokhylla verify`.
///
/// Defaults describe the Libris result set for 1956, which is stable
/// because the catalogued material itself no longer changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    #[serde(default = "default_verification_year")]
    pub year: i32,
    #[serde(default = "default_expected_rows")]
    pub expected_rows: usize,
    #[serde(default = "default_expected_title")]
    pub expected_title: String,
    #[serde(default = "default_expected_given_name")]
    pub expected_given_name: String,
    #[serde(default = "default_expected_family_name")]
    pub expected_family_name: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            year: default_verification_year(),
            expected_rows: default_expected_rows(),
            expected_title: default_expected_title(),
            expected_given_name: default_expected_given_name(),
            expected_family_name: default_expected_family_name(),
        }
    }
}

fn default_verification_year() -> i32 {
    1956
}

fn default_expected_rows() -> usize {
    3539
}

fn default_expected_title() -> String {
    "En eld är havet".to_string()
}

fn default_expected_given_name() -> String {
    "Rut".to_string()
}

fn default_expected_family_name() -> String {
    "Hillarp".to_string()
}

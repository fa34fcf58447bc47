pub mod config;
pub mod ingest;
pub mod library;
pub mod snapshot;
pub mod sparql;

pub use config::{
    load_config, load_config_from_str, Config, ConfigError, DatabaseConfig, ImportConfig,
    SparqlConfig, VerificationConfig,
};
pub use ingest::{ImportSummary, Importer, IngestError};
pub use library::{
    Library, LibraryError, LibraryStats, SnapshotOutcome, SqliteLibrary, StoredBook,
};
pub use snapshot::{GoodreadsMeta, NewBook, RawBook};
pub use sparql::{SparqlClient, SparqlError, SparqlResponse};

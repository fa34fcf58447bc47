use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bokhylla_core::{load_config, Config, Importer, SparqlClient, SqliteLibrary};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("bokhylla {}", VERSION);

    // Determine config path
    let config_path = std::env::var("BOKHYLLA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; every section has defaults so the file is optional
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No configuration file at {:?}, using defaults", config_path);
        Config::default()
    };

    match std::env::args().nth(1).as_deref() {
        Some("import") => run_import(&config),
        Some("verify") => run_verify(&config).await,
        Some(other) => bail!("Unknown command '{}'. Usage: bokhylla <import|verify>", other),
        None => bail!("Usage: bokhylla <import|verify>"),
    }
}

fn run_import(config: &Config) -> Result<()> {
    let db_path = &config.database.path;

    // The importer rebuilds the catalogue from scratch every run
    if db_path.is_file() {
        info!("Removing existing database {:?}", db_path);
        std::fs::remove_file(db_path)
            .with_context(|| format!("Failed to remove {:?}", db_path))?;
    }

    let library = SqliteLibrary::new(db_path)
        .with_context(|| format!("Failed to open library at {:?}", db_path))?;
    info!("Library initialized at {:?}", db_path);

    let importer = Importer::new(&library);
    let summary = importer
        .run(&config.import.snapshot_dir)
        .context("Import failed")?;

    if summary.files_failed > 0 {
        warn!("{} snapshot files could not be imported", summary.files_failed);
    }

    Ok(())
}

async fn run_verify(config: &Config) -> Result<()> {
    let client = SparqlClient::new(&config.sparql).context("Failed to create SPARQL client")?;

    client
        .verify(&config.sparql.verification)
        .await
        .context("Endpoint verification failed")?;

    info!(
        "Verification passed for year {}",
        config.sparql.verification.year
    );
    Ok(())
}

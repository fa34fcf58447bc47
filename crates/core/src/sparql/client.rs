use std::fs;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::types::SparqlResponse;
use super::SparqlError;
use crate::config::{SparqlConfig, VerificationConfig};

/// Bundled Libris query for Swedish fiction published in a given year.
pub const DEFAULT_QUERY: &str = include_str!("libris.rq");

const RESULT_FORMAT: &str = "application/sparql-results+json";

/// Substitute the year into a query template (first `|YEAR|` occurrence).
pub fn build_query(template: &str, year: i32) -> String {
    template.replacen("|YEAR|", &year.to_string(), 1)
}

/// Client for the Libris SPARQL endpoint.
pub struct SparqlClient {
    client: Client,
    endpoint: String,
    query_template: String,
}

impl SparqlClient {
    /// Create a new client. Uses the bundled query template unless the
    /// config points at an alternative file.
    pub fn new(config: &SparqlConfig) -> Result<Self, SparqlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let query_template = match &config.query_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                SparqlError::Parse(format!(
                    "Failed to read query template {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => DEFAULT_QUERY.to_string(),
        };

        Ok(Self {
            client,
            endpoint: config.endpoint_url.clone(),
            query_template,
        })
    }

    /// Run the query for one year and return the parsed result set.
    pub async fn select(&self, year: i32) -> Result<SparqlResponse, SparqlError> {
        let query = build_query(&self.query_template, year);

        debug!("Querying {} for year {}", self.endpoint, year);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.as_str()), ("format", RESULT_FORMAT)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SparqlError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<SparqlResponse>()
            .await
            .map_err(|e| SparqlError::Parse(format!("Failed to parse SPARQL results: {e}")))
    }

    /// Assert the endpoint still returns the known-good result set: the
    /// expected row count for the verification year, and a row carrying the
    /// expected title and author names. No retry on failure.
    pub async fn verify(&self, expected: &VerificationConfig) -> Result<(), SparqlError> {
        let response = self.select(expected.year).await?;
        let rows = &response.results.bindings;

        info!("Endpoint returned {} rows for {}", rows.len(), expected.year);

        if rows.len() != expected.expected_rows {
            return Err(SparqlError::Verification(format!(
                "expected {} rows for {}, got {}",
                expected.expected_rows,
                expected.year,
                rows.len()
            )));
        }

        let found = rows.iter().any(|row| {
            row.value("title") == Some(expected.expected_title.as_str())
                && row.value("givenName") == Some(expected.expected_given_name.as_str())
                && row.value("familyName") == Some(expected.expected_family_name.as_str())
        });

        if !found {
            return Err(SparqlError::Verification(format!(
                "no row with title '{}' by {} {} in the {} results",
                expected.expected_title,
                expected.expected_given_name,
                expected.expected_family_name,
                expected.year
            )));
        }

        Ok(())
    }
}

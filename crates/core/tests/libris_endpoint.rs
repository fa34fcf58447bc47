//! Live check against the public Libris SPARQL endpoint.
//!
//! Run with `cargo test -- --ignored` when network access is available.

use bokhylla_core::{SparqlClient, SparqlConfig, VerificationConfig};

#[tokio::test]
#[ignore = "requires network access to libris.kb.se"]
async fn returns_expected_titles_for_known_year() {
    let config = SparqlConfig::default();
    let client = SparqlClient::new(&config).unwrap();

    let response = client.select(1956).await.unwrap();
    let rows = &response.results.bindings;

    assert_eq!(rows.len(), 3539);
    assert!(rows.iter().any(|row| {
        row.value("title") == Some("En eld är havet")
            && row.value("givenName") == Some("Rut")
            && row.value("familyName") == Some("Hillarp")
    }));
}

#[tokio::test]
#[ignore = "requires network access to libris.kb.se"]
async fn verify_passes_with_default_expectations() {
    let config = SparqlConfig::default();
    let client = SparqlClient::new(&config).unwrap();

    client.verify(&VerificationConfig::default()).await.unwrap();
}

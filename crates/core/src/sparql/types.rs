//! SPARQL JSON results format (application/sparql-results+json).

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    pub head: SparqlHead,
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    pub bindings: Vec<SparqlBinding>,
}

/// One result row: variable name -> bound value.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SparqlBinding(pub HashMap<String, SparqlValue>);

impl SparqlBinding {
    /// The bound string for a variable, if present in this row.
    pub fn value(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|v| v.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    /// "uri", "literal" or "bnode".
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

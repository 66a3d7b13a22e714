//! Tabular result sets in the SPARQL JSON results shape.
//!
//! ```json
//! { "head": { "vars": ["s", "p", "o"] },
//!   "results": { "bindings": [ { "s": {"type": "uri", "value": "..."} } ] } }
//! ```

use crate::model::TypedValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One binding row: field name to bound value. Unbound fields are absent.
pub type Row = HashMap<String, TypedValue>;

/// An immutable, fully materialized query result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    fields: Vec<String>,
    rows: Vec<Row>,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SparqlJson {
    #[serde(default)]
    head: SparqlHead,
    results: SparqlResults,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SparqlHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<Row>,
}

// ============================================================================
// ResultSet
// ============================================================================

impl ResultSet {
    /// Create a result set from projected fields and rows.
    ///
    /// Field names must be unique.
    pub fn new(fields: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(Error::invalid_data(format!(
                    "duplicate field '{field}' in result set"
                )));
            }
        }
        Ok(Self { fields, rows })
    }

    /// Parse a SPARQL JSON results document.
    ///
    /// When `head.vars` is empty the fields are taken from the bindings in
    /// first-seen order (sorted within each row for stability).
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: SparqlJson = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("Failed to parse SPARQL results JSON: {e}")))?;
        Self::from_wire(parsed)
    }

    /// Parse a SPARQL JSON results document from an already-decoded value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let parsed: SparqlJson = serde_json::from_value(value)
            .map_err(|e| Error::parse(format!("Failed to parse SPARQL results JSON: {e}")))?;
        Self::from_wire(parsed)
    }

    fn from_wire(parsed: SparqlJson) -> Result<Self> {
        let mut fields = parsed.head.vars;
        if fields.is_empty() {
            let mut seen = HashSet::new();
            for row in &parsed.results.bindings {
                let mut names: Vec<&String> = row.keys().collect();
                names.sort();
                for name in names {
                    if seen.insert(name.clone()) {
                        fields.push(name.clone());
                    }
                }
            }
        }
        Self::new(fields, parsed.results.bindings)
    }

    /// Serialize back into the SPARQL JSON results shape.
    pub fn to_json(&self) -> Result<String> {
        let wire = SparqlJson {
            head: SparqlHead {
                vars: self.fields.clone(),
            },
            results: SparqlResults {
                bindings: self.rows.clone(),
            },
        };
        serde_json::to_string(&wire).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Projected field names in query order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// All rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `field` is one of the projected fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

//! Query result rows and their SPARQL JSON wire shape.
//!
//! ```json
//! { "head": { "vars": ["property", "range"] },
//!   "results": { "bindings": [
//!     { "property": { "type": "uri", "value": "https://example.com/name" } } ] } }
//! ```
//!
//! Variables absent from a binding object are unbound.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTerm", into = "WireTerm")]
pub enum TaggedValue {
    /// An IRI.
    Uri(String),
    /// The lexical form of a literal.
    Literal(String),
    /// An `OPTIONAL` variable that did not match.
    Unbound,
    /// Any other term kind (blank node, quoted triple, ...).
    Unrecognized {
        /// The wire `type` tag.
        kind: String,
        /// The wire `value`.
        value: String,
    },
}

static UNBOUND: TaggedValue = TaggedValue::Unbound;

impl TaggedValue {
    /// Returns false for [`TaggedValue::Unbound`].
    pub fn is_bound(&self) -> bool {
        !matches!(self, TaggedValue::Unbound)
    }

    /// The raw string carried by the cell, or "" when unbound.
    pub fn raw(&self) -> &str {
        match self {
            TaggedValue::Uri(value) | TaggedValue::Literal(value) => value,
            TaggedValue::Unrecognized { value, .. } => value,
            TaggedValue::Unbound => "",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireTerm {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: String,
}

impl From<WireTerm> for TaggedValue {
    fn from(term: WireTerm) -> Self {
        match term.kind.as_str() {
            "uri" => TaggedValue::Uri(term.value),
            "literal" | "typed-literal" => TaggedValue::Literal(term.value),
            "unbound" => TaggedValue::Unbound,
            _ => TaggedValue::Unrecognized {
                kind: term.kind,
                value: term.value,
            },
        }
    }
}

impl From<TaggedValue> for WireTerm {
    fn from(value: TaggedValue) -> Self {
        let (kind, value) = match value {
            TaggedValue::Uri(value) => ("uri".to_string(), value),
            TaggedValue::Literal(value) => ("literal".to_string(), value),
            TaggedValue::Unbound => ("unbound".to_string(), String::new()),
            TaggedValue::Unrecognized { kind, value } => (kind, value),
        };
        Self { kind, value }
    }
}

/// A result row: query variable name to cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, TaggedValue>);

impl Row {
    /// Creates an empty row (every variable unbound).
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `value`. Binding [`TaggedValue::Unbound`] removes it.
    pub fn bind(&mut self, variable: impl Into<String>, value: TaggedValue) {
        let variable = variable.into();
        if value.is_bound() {
            self.0.insert(variable, value);
        } else {
            self.0.remove(&variable);
        }
    }

    /// Builder form of [`Row::bind`].
    #[must_use]
    pub fn with(mut self, variable: impl Into<String>, value: TaggedValue) -> Self {
        self.bind(variable, value);
        self
    }

    /// The cell for `variable`; [`TaggedValue::Unbound`] when absent.
    pub fn get(&self, variable: &str) -> &TaggedValue {
        self.0.get(variable).unwrap_or(&UNBOUND)
    }

    /// Iterates over bound variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Projection header of a result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    /// Projected variable names, in projection order.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Row container of a result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    /// Rows in result order.
    #[serde(default)]
    pub bindings: Vec<Row>,
}

/// A complete solution sequence in the SPARQL 1.1 JSON results shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Projected variables.
    #[serde(default)]
    pub head: Head,
    /// Solution rows.
    pub results: Bindings,
}

impl ResultSet {
    /// Builds a result set from projected variables and rows.
    pub fn new(vars: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            head: Head { vars },
            results: Bindings { bindings: rows },
        }
    }

    /// Decodes a recorded SPARQL JSON results document.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Json`] if the document does not have the
    /// expected shape.
    pub fn from_json(text: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes the result set as a SPARQL JSON results document.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, FetchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rows in result order.
    pub fn rows(&self) -> &[Row] {
        &self.results.bindings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_shape() {
        let text = r#"{
            "head": { "vars": ["property", "label", "node"] },
            "results": { "bindings": [
                { "property": { "type": "uri", "value": "https://example.com/name" },
                  "label": { "type": "literal", "value": "name", "xml:lang": "en" },
                  "node": { "type": "bnode", "value": "b0" } },
                { "label": { "type": "typed-literal", "value": "42",
                             "datatype": "http://www.w3.org/2001/XMLSchema#integer" } }
            ] }
        }"#;
        let results = ResultSet::from_json(text).unwrap();
        assert_eq!(results.head.vars, ["property", "label", "node"]);
        let rows = results.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("property"),
            &TaggedValue::Uri("https://example.com/name".to_string())
        );
        assert_eq!(rows[0].get("label"), &TaggedValue::Literal("name".to_string()));
        assert_eq!(
            rows[0].get("node"),
            &TaggedValue::Unrecognized {
                kind: "bnode".to_string(),
                value: "b0".to_string()
            }
        );
        assert_eq!(rows[1].get("property"), &TaggedValue::Unbound);
        assert_eq!(rows[1].get("label").raw(), "42");
    }

    #[test]
    fn binding_unbound_removes_the_cell() {
        let mut row = Row::new().with("range", TaggedValue::Literal("x".to_string()));
        row.bind("range", TaggedValue::Unbound);
        assert!(!row.get("range").is_bound());
        assert_eq!(row.iter().count(), 0);
    }

    #[test]
    fn encodes_back_to_wire_shape() {
        let row = Row::new().with("p", TaggedValue::Uri("https://example.com/p".to_string()));
        let results = ResultSet::new(vec!["p".to_string()], vec![row]);
        let json = results.to_json().unwrap();
        assert!(json.contains(r#""type": "uri""#));
        assert_eq!(ResultSet::from_json(&json).unwrap(), results);
    }
}

//! Typed values bound to result-set variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of RDF term a binding holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// An IRI.
    Uri,
    /// A plain, language-tagged, or typed literal.
    #[serde(alias = "typed-literal")]
    Literal,
    /// A blank node label.
    Bnode,
}

impl TermKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Literal => "literal",
            Self::Bnode => "bnode",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bound value in a result row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedValue {
    /// Term kind.
    #[serde(rename = "type")]
    pub kind: TermKind,
    /// Lexical value.
    pub value: String,
    /// Language tag for literals.
    #[serde(
        default,
        rename = "xml:lang",
        alias = "lang",
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    /// Datatype IRI for typed literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl TypedValue {
    /// Create an IRI value.
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Uri,
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    /// Create a plain literal value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    /// Attach a language tag.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Attach a datatype IRI.
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    /// Whether this value is a literal.
    pub fn is_literal(&self) -> bool {
        self.kind == TermKind::Literal
    }

    /// Whether this value is an IRI.
    pub fn is_uri(&self) -> bool {
        self.kind == TermKind::Uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_value_from_sparql_json() {
        let value: TypedValue = serde_json::from_str(
            r#"{"type":"literal","value":"Katze","xml:lang":"de"}"#,
        )
        .unwrap();
        assert_eq!(value.kind, TermKind::Literal);
        assert_eq!(value.lang.as_deref(), Some("de"));
    }

    #[test]
    fn test_typed_value_lang_alias() {
        let value: TypedValue =
            serde_json::from_str(r#"{"type":"literal","value":"cat","lang":"en"}"#).unwrap();
        assert_eq!(value.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_typed_literal_alias() {
        let value: TypedValue = serde_json::from_str(
            r#"{"type":"typed-literal","value":"3","datatype":"http://www.w3.org/2001/XMLSchema#integer"}"#,
        )
        .unwrap();
        assert!(value.is_literal());
        assert!(value.datatype.is_some());
    }

    #[test]
    fn test_term_kind_display() {
        assert_eq!(TermKind::Uri.to_string(), "uri");
        assert_eq!(TermKind::Bnode.as_str(), "bnode");
    }
}

//! Computed field names.
//!
//! These names may appear in an encoding without being projected by the
//! query: the engine fills them in from the built graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field computed by the engine rather than read from a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedField {
    /// Node degree (alias of `connections`).
    Links,
    /// Node degree.
    Connections,
    /// Term kind of the node entity: `uri`, `literal` or `bnode`.
    Type,
}

impl ReservedField {
    /// All reserved fields.
    pub const ALL: [ReservedField; 3] = [Self::Links, Self::Connections, Self::Type];

    /// Look up a reserved field by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }

    /// Whether `name` is reserved.
    pub fn is_reserved(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Connections => "connections",
            Self::Type => "type",
        }
    }

    /// Whether the field holds a node degree.
    pub fn is_degree(&self) -> bool {
        matches!(self, Self::Links | Self::Connections)
    }
}

impl fmt::Display for ReservedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Data-quality warnings.
//!
//! None of these stop a cycle: each comes with a usable result and is
//! logged once where it is raised.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal problem found while resolving an encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EncodingWarning {
    /// A range names no known scheme or interpolator.
    UnresolvableSchemeName {
        /// Name as written.
        name: String,
        /// Palette used instead.
        fallback: String,
    },
    /// A field has no usable values; its channel stays unencoded.
    EmptyDomain {
        /// Field name.
        field: String,
    },
    /// A user domain repeats a value; later occurrences are dropped.
    DuplicateDomainValue {
        /// Field name.
        field: String,
        /// Repeated value.
        value: String,
    },
    /// A literal range lists no values; a built-in palette is used.
    EmptyRange {
        /// Palette used instead.
        fallback: String,
    },
    /// A range is shorter than its domain and wraps around.
    RangeLengthMismatch {
        /// Number of domain values.
        domain_len: usize,
        /// Number of range values.
        range_len: usize,
    },
}

impl EncodingWarning {
    /// Emit the warning through the `log` facade.
    pub fn log(&self) {
        log::warn!("{self}");
    }
}

impl fmt::Display for EncodingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvableSchemeName { name, fallback } => {
                write!(f, "unknown color scheme '{name}', using {fallback}")
            }
            Self::EmptyDomain { field } => {
                write!(f, "field '{field}' has no values; channel left unencoded")
            }
            Self::DuplicateDomainValue { field, value } => {
                write!(f, "domain for '{field}' repeats '{value}'")
            }
            Self::EmptyRange { fallback } => {
                write!(f, "empty color range, using {fallback}")
            }
            Self::RangeLengthMismatch {
                domain_len,
                range_len,
            } => write!(
                f,
                "range has {range_len} value(s) for {domain_len} domain value(s); wrapping"
            ),
        }
    }
}

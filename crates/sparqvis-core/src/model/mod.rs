//! Data model shared by the graph and encoding crates.
//!
//! - [`term`]: typed values as produced by a SPARQL endpoint
//! - [`result_set`]: the tabular result set and its JSON wire format
//! - [`value`]: loosely-typed scale values used in domains and ranges
//! - [`encoding`]: the declarative visual-encoding specification
//! - [`reserved`]: computed field names that never appear in a result set

pub mod encoding;
pub mod reserved;
pub mod result_set;
pub mod term;
pub mod value;

pub use encoding::{
    ChannelEncoding, EncodingSpec, LinkEncoding, LinkField, NodeEncoding, RangeSpec, ScaleConfig,
    ScaleType,
};
pub use reserved::ReservedField;
pub use result_set::{ResultSet, Row};
pub use term::{TermKind, TypedValue};
pub use value::ScaleValue;

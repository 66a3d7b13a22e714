//! Graph model and result-set transformation for Sparqvis.
//!
//! This crate turns a fully materialized result set into deduplicated
//! nodes and links, backed by a petgraph `DiGraph`.
//!
//! # Key Abstractions
//!
//! - [`FieldMapping`]: which fields act as link source/target and which
//!   link kind applies, resolved from an encoding spec
//! - [`transform`]: walks rows, builds nodes and links, resolves labels,
//!   and computes co-occurrence links
//! - [`validate_encoding`]: gates a transformation on the encoding spec
//! - [`compute_stats`]: degree and composition statistics

#![doc = include_str!("../README.md")]

pub mod cooccurrence;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;
pub mod labels;
pub mod mapping;
pub mod persistence;
pub mod stats;
pub mod transform;
pub mod types;
pub mod validation;

pub use mapping::{FieldMapping, resolve_field_mapping};
pub use persistence::{
    GraphMetadata, SerializableGraph, is_cache_fresh, load_graph, load_graph_from_str, save_graph,
};
pub use stats::{DegreeDirection, GraphStats, compute_stats, quick_summary, top_nodes_by_degree};
pub use transform::transform;
pub use types::{GraphData, Link, LinkKind, Node, SharedValue};
pub use validation::{ValidationIssue, ValidationResult, is_valid_encoding, validate_encoding};

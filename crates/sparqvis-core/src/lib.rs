//! Sparqvis Core: shared types, errors, configuration, and utilities.
//!
//! This crate provides the foundational types used across all Sparqvis crates.
//! It has no internal Sparqvis dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`model`]: Result sets, typed values, and encoding specifications
//! - [`config`]: Engine configuration loaded from file and environment
//! - [`util`]: Entity id extraction

#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod model;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use model::{
    ChannelEncoding, EncodingSpec, LinkEncoding, LinkField, NodeEncoding, RangeSpec,
    ReservedField, ResultSet, Row, ScaleConfig, ScaleType, ScaleValue, TermKind, TypedValue,
};

// Convenience re-exports from util
pub use util::ids::extract_id;

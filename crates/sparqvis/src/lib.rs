//! Sparqvis: encoding resolution and graph transformation for SPARQL
//! result sets.
//!
//! This crate re-exports the component crates so applications depend on
//! one name.

#![doc = include_str!("../README.md")]

pub use sparqvis_core as core;
pub use sparqvis_encoding as encoding;
pub use sparqvis_graph as graph;

pub use sparqvis_core::{EncodingSpec, EngineConfig, Error, Result, ResultSet, TypedValue};
pub use sparqvis_encoding::{
    CompletedEncoding, CycleOutcome, EncodingOrchestrator, EncodingWarning, RenderModel,
};
pub use sparqvis_graph::{GraphData, Link, Node, ValidationResult};

//! Encoding resolution for Sparqvis.
//!
//! Sits on top of `sparqvis-graph`: once a result set is a graph, this
//! crate decides what every node looks like.
//!
//! # Key Abstractions
//!
//! - [`DomainCalculator`]: reconciles user domains with extracted values
//! - [`create_color_scale`]: palette names, fallbacks, and range alignment
//! - [`detect_classification_field`]: picks a field to color by
//! - [`EncodingOrchestrator`]: drives the full cycle and keeps the result

#![doc = include_str!("../README.md")]

pub mod cache;
pub mod classify;
pub mod domain;
pub mod orchestrator;
pub mod palette;
pub mod scale;
pub mod warning;

pub use cache::{ScaleCache, data_signature, signature_of};
pub use classify::{Classification, detect_classification_field};
pub use domain::{
    DataRecord, DomainCalculator, DomainCase, DomainResolution, FieldStats, resolve_domain,
    sort_domain,
};
pub use orchestrator::{
    CompletedEncoding, CycleOutcome, EncodingOrchestrator, RenderModel, complete_encoding,
    default_encoding, node_records,
};
pub use palette::{
    ColorScale, ColorScaleRequest, Fallback, SchemeKind, SchemeReference, create_color_scale,
    get_best_fallback, parse_scheme_reference,
};
pub use scale::{ChannelResolution, ResolvedScale, SizeScale, create_size_scale};
pub use warning::EncodingWarning;

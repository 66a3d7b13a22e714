//! The encoding cycle.
//!
//! One cycle takes a result set and an encoding spec through:
//!
//! 1. validation (a failing report rejects the cycle, state is untouched)
//! 2. field-mapping resolution and graph transformation
//! 3. classification, when no color is encoded
//! 4. domain and palette resolution per encoded channel, cached by
//!    encoding and data signature
//!
//! [`complete_encoding`] is the pure core; [`EncodingOrchestrator`] adds
//! caching and keeps the last applied [`RenderModel`].

use crate::cache::{ScaleCache, data_signature, signature_of};
use crate::classify::{Classification, detect_classification_field};
use crate::domain::{DataRecord, DomainCalculator, FieldStats};
use crate::palette::{ColorScaleRequest, create_color_scale};
use crate::scale::{ChannelResolution, create_size_scale};
use crate::EncodingWarning;
use serde::{Deserialize, Serialize};
use sparqvis_core::{
    ChannelEncoding, EncodingSpec, EngineConfig, LinkField, NodeEncoding, RangeSpec,
    ReservedField, Result, ResultSet, ScaleConfig, ScaleType, ScaleValue,
};
use sparqvis_graph::{
    FieldMapping, GraphData, Node, ValidationResult, resolve_field_mapping, transform,
    validate_encoding,
};

const COLOR: &str = "color";
const SIZE: &str = "size";

// ============================================================================
// Default encoding
// ============================================================================

/// Encoding used when the caller supplies none.
///
/// Nodes come from the first field, links run from the first to the second
/// field, and nodes are sized by their number of connections.
pub fn default_encoding(available_fields: &[String]) -> EncodingSpec {
    let mut spec = EncodingSpec::default();
    if let Some(first) = available_fields.first() {
        spec.nodes.field = Some(vec![first.clone()]);
        spec.nodes.size = Some(ChannelEncoding::field(ReservedField::Connections.as_str()));
    }
    if let [first, second, ..] = available_fields {
        spec.links.field = Some(LinkField::directional(first.clone(), second.clone()));
    }
    spec
}

// ============================================================================
// Node records
// ============================================================================

/// Value of `field` on `node`.
///
/// Row attributes win over the reserved pseudo-fields: `links` and
/// `connections` give the degree, `type` the term kind.
pub fn node_value(node: &Node, field: &str) -> Option<ScaleValue> {
    if let Some(value) = node.attributes.get(field) {
        return Some(ScaleValue::text(value.clone()));
    }
    match ReservedField::from_name(field)? {
        reserved if reserved.is_degree() => Some(ScaleValue::from(node.degree)),
        _ => Some(ScaleValue::text(node.kind.as_str())),
    }
}

/// One record per node, for domain extraction and classification.
pub fn node_records(graph: &GraphData) -> Vec<DataRecord> {
    graph
        .iter_nodes()
        .map(|node| {
            let mut record: DataRecord = ReservedField::ALL
                .iter()
                .filter_map(|r| node_value(node, r.as_str()).map(|v| (r.as_str().to_string(), v)))
                .collect();
            for (field, value) in &node.attributes {
                record.insert(field.clone(), ScaleValue::text(value.clone()));
            }
            record
        })
        .collect()
}

// ============================================================================
// Completion
// ============================================================================

/// An encoding with every default filled in, plus its resolved scales.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedEncoding {
    /// The encoding with scale types, domains, ranges, and link defaults set.
    pub spec: EncodingSpec,
    /// Color resolution, when color is bound to a field with values.
    pub color: Option<ChannelResolution>,
    /// Size resolution, when size is bound to a field with values.
    pub size: Option<ChannelResolution>,
    /// Field picked for color when the encoding left color open.
    pub classification: Option<Classification>,
    /// Every warning raised while completing.
    pub warnings: Vec<EncodingWarning>,
}

/// Fill in `spec` against `records`.
///
/// The input spec is not modified.
pub fn complete_encoding(
    spec: &EncodingSpec,
    records: &[DataRecord],
    available_fields: &[String],
    config: &EngineConfig,
) -> CompletedEncoding {
    let mut domains = DomainCalculator::new();
    Resolver {
        domains: &mut domains,
        cache: None,
    }
    .complete(spec, records, available_fields, config)
}

struct Resolver<'a> {
    domains: &'a mut DomainCalculator,
    cache: Option<&'a mut ScaleCache>,
}

impl Resolver<'_> {
    fn complete(
        &mut self,
        spec: &EncodingSpec,
        records: &[DataRecord],
        available_fields: &[String],
        config: &EngineConfig,
    ) -> CompletedEncoding {
        let mut completed = spec.clone();
        let mut warnings = Vec::new();

        let mut classification = None;
        let color_channel = match &spec.nodes.color {
            Some(channel) if channel.field.is_some() || channel.value.is_some() => channel.clone(),
            open => {
                let found = detect_classification_field(
                    records,
                    available_fields,
                    &config.classification,
                );
                log::debug!("coloring by '{}': {}", found.field, found.reason);
                let mut channel = ChannelEncoding::field(found.field.clone());
                channel.scale = open.as_ref().and_then(|c| c.scale.clone());
                classification = Some(found);
                channel
            }
        };

        let color = color_channel.field.as_deref().map(|field| {
            self.resolve(field, COLOR, |domains| {
                resolve_color(domains, records, field, color_channel.scale.as_ref())
            })
        });
        let size_channel = spec.nodes.size.clone().unwrap_or_default();
        let size = size_channel.field.as_deref().map(|field| {
            self.resolve(field, SIZE, |domains| {
                resolve_size(domains, records, field, size_channel.scale.as_ref(), config)
            })
        });

        completed.nodes = NodeEncoding {
            field: spec.nodes.field.clone(),
            color: Some(finish_channel(
                color_channel,
                color.as_ref(),
                ScaleValue::text(config.nodes.default_color.clone()),
            )),
            size: Some(finish_channel(
                size_channel,
                size.as_ref(),
                ScaleValue::Number(config.nodes.default_size),
            )),
        };

        let links = &mut completed.links;
        links.distance.get_or_insert(config.links.distance);
        links
            .width
            .get_or_insert_with(|| ChannelEncoding::constant(config.links.width));
        links
            .color
            .get_or_insert_with(|| ChannelEncoding::constant(config.links.color.clone()));

        for resolution in color.iter().chain(size.iter()) {
            warnings.extend(resolution.warnings.iter().cloned());
        }

        CompletedEncoding {
            spec: completed,
            color: color.filter(ChannelResolution::is_encoded),
            size: size.filter(ChannelResolution::is_encoded),
            classification,
            warnings,
        }
    }

    fn resolve(
        &mut self,
        field: &str,
        channel: &str,
        build: impl FnOnce(&mut DomainCalculator) -> ChannelResolution,
    ) -> ChannelResolution {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(field, channel)) {
            log::trace!("scale cache hit for {channel} '{field}'");
            return hit.clone();
        }
        let resolution = build(&mut *self.domains);
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(field, channel, resolution.clone());
        }
        resolution
    }
}

fn resolve_color(
    domains: &mut DomainCalculator,
    records: &[DataRecord],
    field: &str,
    scale: Option<&ScaleConfig>,
) -> ChannelResolution {
    let scale_type = scale.map(|s| s.scale_type).unwrap_or_default();
    let user_domain = scale.and_then(|s| s.domain.as_deref());
    let resolved = domains.get_domain(records, field, user_domain, scale_type);

    let mut warnings = resolved.warnings;
    let color = create_color_scale(ColorScaleRequest {
        domain: resolved.domain,
        range: scale.and_then(|s| s.range.as_ref()),
        scale_type,
        fallback: None,
    });
    warnings.extend(color.warnings);

    ChannelResolution {
        field: field.to_string(),
        scale: color.scale,
        case: resolved.case,
        palette: Some(color.palette),
        warnings,
    }
}

fn resolve_size(
    domains: &mut DomainCalculator,
    records: &[DataRecord],
    field: &str,
    scale: Option<&ScaleConfig>,
    config: &EngineConfig,
) -> ChannelResolution {
    let scale_type = scale.map(|s| s.scale_type).unwrap_or_else(|| {
        let stats = FieldStats::collect(records, field);
        if stats.unique_count > 0 && stats.unique_values.iter().all(|v| v.as_number().is_some()) {
            ScaleType::Linear
        } else {
            ScaleType::Ordinal
        }
    });
    let user_domain = scale.and_then(|s| s.domain.as_deref());
    let resolved = domains.get_domain(records, field, user_domain, scale_type);

    let mut warnings = resolved.warnings;
    let size = create_size_scale(
        resolved.domain,
        scale_type,
        scale.and_then(|s| s.range.as_ref()),
        (config.nodes.min_size, config.nodes.max_size),
    );
    warnings.extend(size.warnings);

    ChannelResolution {
        field: field.to_string(),
        scale: size.scale,
        case: resolved.case,
        palette: None,
        warnings,
    }
}

/// Write a resolution back into its channel, or the constant when unencoded.
fn finish_channel(
    mut channel: ChannelEncoding,
    resolution: Option<&ChannelResolution>,
    default: ScaleValue,
) -> ChannelEncoding {
    match resolution.filter(|r| r.is_encoded()) {
        Some(r) => {
            channel.scale = Some(
                ScaleConfig::of_type(r.scale.scale_type)
                    .with_domain(r.scale.domain().to_vec())
                    .with_range(RangeSpec::Values(r.scale.range().to_vec())),
            );
        }
        None => {
            channel.value.get_or_insert(default);
        }
    }
    channel
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Everything a renderer needs from one applied cycle.
#[derive(Clone, Debug)]
pub struct RenderModel {
    /// Transformed graph.
    pub graph: GraphData,
    /// Mapping the graph was built with.
    pub mapping: FieldMapping,
    /// Completed encoding and resolved scales.
    pub encoding: CompletedEncoding,
    /// Validation report, including warnings and notes.
    pub validation: ValidationResult,
    /// Signature of the encoding spec as given.
    pub encoding_signature: String,
    /// Signature of the result set.
    pub data_signature: String,
}

impl RenderModel {
    /// Fill color of `node`.
    pub fn node_color(&self, node: &Node) -> String {
        let channel = self.encoding.spec.nodes.color.as_ref();
        self.encoding
            .color
            .as_ref()
            .and_then(|r| lookup(r, node))
            .or_else(|| channel.and_then(|c| c.value.clone()))
            .map(|v| v.as_text().into_owned())
            .unwrap_or_default()
    }

    /// Radius of `node`.
    pub fn node_size(&self, node: &Node) -> f64 {
        let channel = self.encoding.spec.nodes.size.as_ref();
        self.encoding
            .size
            .as_ref()
            .and_then(|r| lookup(r, node))
            .or_else(|| channel.and_then(|c| c.value.clone()))
            .and_then(|v| v.as_number())
            .unwrap_or_default()
    }
}

fn lookup(resolution: &ChannelResolution, node: &Node) -> Option<ScaleValue> {
    let value = node_value(node, &resolution.field)?;
    resolution.scale.lookup(&value).cloned()
}

/// Result of [`EncodingOrchestrator::run`].
#[derive(Clone, Debug)]
pub enum CycleOutcome {
    /// The cycle succeeded and its model is now current.
    Applied,
    /// Validation failed; the previous model is kept.
    Rejected(ValidationResult),
}

impl CycleOutcome {
    /// Whether the cycle was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Runs encoding cycles and keeps the last applied model.
#[derive(Debug, Default)]
pub struct EncodingOrchestrator {
    config: EngineConfig,
    domains: DomainCalculator,
    cache: ScaleCache,
    current: Option<RenderModel>,
}

impl EncodingOrchestrator {
    /// Create an orchestrator with the given defaults.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one cycle over `result_set`.
    ///
    /// Without an encoding, [`default_encoding`] is used. Validation errors
    /// reject the cycle and leave the current model and cache as they were.
    pub fn run(
        &mut self,
        result_set: &ResultSet,
        encoding: Option<&EncodingSpec>,
    ) -> Result<CycleOutcome> {
        let fields = result_set.fields();
        let spec = match encoding {
            Some(spec) => spec.clone(),
            None => default_encoding(fields),
        };

        let validation = validate_encoding(&spec, fields);
        if !validation.valid {
            log::warn!(
                "encoding rejected: {}",
                validation.messages().join("; ")
            );
            return Ok(CycleOutcome::Rejected(validation));
        }

        let mapping = resolve_field_mapping(Some(&spec), fields)?;
        let graph = transform(result_set, &mapping)?;
        let records = node_records(&graph);

        let encoding_signature = signature_of(&spec)?;
        let data_signature = data_signature(result_set);
        if self.cache.sync(&encoding_signature, &data_signature) {
            self.domains.clear();
        }

        let completed = Resolver {
            domains: &mut self.domains,
            cache: Some(&mut self.cache),
        }
        .complete(&spec, &records, fields, &self.config);

        log::info!(
            "encoding applied: {} nodes, {} links, {} warning(s)",
            graph.node_count(),
            graph.link_count(),
            completed.warnings.len()
        );

        self.current = Some(RenderModel {
            graph,
            mapping,
            encoding: completed,
            validation,
            encoding_signature,
            data_signature,
        });
        Ok(CycleOutcome::Applied)
    }

    /// Model of the last applied cycle.
    pub fn current(&self) -> Option<&RenderModel> {
        self.current.as_ref()
    }

    /// Drop cached scales and statistics. The current model is kept.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.domains.clear();
    }

    /// Number of cached channel resolutions.
    pub fn cached_scales(&self) -> usize {
        self.cache.len()
    }

    /// Color of `node` under the current model.
    pub fn node_color(&self, node: &Node) -> String {
        match &self.current {
            Some(model) => model.node_color(node),
            None => self.config.nodes.default_color.clone(),
        }
    }

    /// Size of `node` under the current model.
    pub fn node_size(&self, node: &Node) -> f64 {
        match &self.current {
            Some(model) => model.node_size(node),
            None => self.config.nodes.default_size,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

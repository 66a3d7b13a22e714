//! The declarative visual-encoding specification.
//!
//! Wire shape:
//!
//! ```json
//! { "nodes": { "field": ["s"],
//!              "color": {"field": "type", "scale": {"type": "ordinal", "range": "Set1"}},
//!              "size": {"field": "links"} },
//!   "links": { "field": {"source": "s", "target": "o"},
//!              "distance": 100, "width": {"value": 1.5}, "color": {"value": "#999"} } }
//! ```
//!
//! Every part except `nodes.field` is optional so that a partially written
//! spec survives deserialization and can be reported on by validation.

use crate::model::ScaleValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Top level
// ============================================================================

/// A complete encoding specification.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingSpec {
    /// Node encoding.
    #[serde(default)]
    pub nodes: NodeEncoding,
    /// Link encoding.
    #[serde(default)]
    pub links: LinkEncoding,
}

impl EncodingSpec {
    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("Failed to parse encoding JSON: {e}")))
    }

    /// Serialize the encoding to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Node fields in declaration order, empty when absent.
    pub fn node_fields(&self) -> &[String] {
        self.nodes.field.as_deref().unwrap_or_default()
    }

    /// Field driving node color, if any.
    pub fn color_field(&self) -> Option<&str> {
        self.nodes.color.as_ref().and_then(|c| c.field.as_deref())
    }

    /// Field driving node size, if any.
    pub fn size_field(&self) -> Option<&str> {
        self.nodes.size.as_ref().and_then(|c| c.field.as_deref())
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// How entities become nodes and how nodes are styled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeEncoding {
    /// Fields whose values become nodes; the first is the primary entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Vec<String>>,
    /// Color channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChannelEncoding>,
    /// Size channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ChannelEncoding>,
}

/// A visual channel bound to a field or to a constant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelEncoding {
    /// Data field driving the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Constant value used when no field is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ScaleValue>,
    /// Scale configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleConfig>,
}

impl ChannelEncoding {
    /// Channel driven by `field`.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    /// Channel fixed to a constant.
    pub fn constant(value: impl Into<ScaleValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Attach a scale.
    pub fn with_scale(mut self, scale: ScaleConfig) -> Self {
        self.scale = Some(scale);
        self
    }
}

// ============================================================================
// Links
// ============================================================================

/// How links are derived and styled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkEncoding {
    /// Link derivation: semantic field name or directional pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<LinkField>,
    /// Preferred link distance for the layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Stroke width channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ChannelEncoding>,
    /// Stroke color channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChannelEncoding>,
}

/// The `links.field` entry.
///
/// Anything that is neither a string nor a `{source, target}` object is kept
/// as [`LinkField::Invalid`] so validation can report it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkField {
    /// Field whose value labels a semantic relation.
    Semantic(String),
    /// Explicit source and target fields.
    Directional {
        /// Source field.
        source: String,
        /// Target field.
        target: String,
    },
    /// Unrecognized shape.
    Invalid(serde_json::Value),
}

impl LinkField {
    /// Directional pair.
    pub fn directional(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Directional {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Semantic relation field.
    pub fn semantic(field: impl Into<String>) -> Self {
        Self::Semantic(field.into())
    }
}

// ============================================================================
// Scales
// ============================================================================

/// Scale kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Discrete categories.
    #[default]
    Ordinal,
    /// Linear continuous.
    Linear,
    /// Square-root continuous.
    Sqrt,
    /// Logarithmic continuous.
    Log,
    /// Sequential color ramp.
    #[serde(alias = "quantitative")]
    Sequential,
}

impl ScaleType {
    /// Whether the scale maps a continuous input.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Ordinal)
    }

    /// Wire name of the scale type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinal => "ordinal",
            Self::Linear => "linear",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Sequential => "sequential",
        }
    }
}

/// A scale range: explicit values or a scheme name like `"Blues[5]"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    /// Named color scheme or interpolator.
    Scheme(String),
    /// Literal values.
    Values(Vec<ScaleValue>),
}

/// Scale configuration for a channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Scale kind.
    #[serde(rename = "type", default)]
    pub scale_type: ScaleType,
    /// User domain, completed during resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<ScaleValue>>,
    /// Output range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeSpec>,
}

impl ScaleConfig {
    /// Scale of the given type with no domain or range.
    pub fn of_type(scale_type: ScaleType) -> Self {
        Self {
            scale_type,
            ..Default::default()
        }
    }

    /// Attach a domain.
    pub fn with_domain(mut self, domain: Vec<ScaleValue>) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Attach a range.
    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }
}

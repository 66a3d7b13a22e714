//! Resolved scales.
//!
//! A [`ResolvedScale`] pairs every domain value with one range value. Ranges
//! longer than the domain are truncated, shorter ones repeat cyclically, so
//! entry `i` of the domain always maps to range entry `i mod len`.

use crate::EncodingWarning;
use crate::domain::DomainCase;
use serde::{Deserialize, Serialize};
use sparqvis_core::{RangeSpec, ScaleType, ScaleValue};

/// A domain aligned one-to-one with a range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScale {
    /// Scale type the scale was built for.
    #[serde(rename = "type")]
    pub scale_type: ScaleType,
    domain: Vec<ScaleValue>,
    range: Vec<ScaleValue>,
}

impl ResolvedScale {
    /// Align `range` to `domain`.
    ///
    /// Repeated domain values are dropped, keeping the first. An empty range
    /// stays empty.
    pub fn new(scale_type: ScaleType, domain: Vec<ScaleValue>, range: Vec<ScaleValue>) -> Self {
        let mut unique: Vec<ScaleValue> = Vec::with_capacity(domain.len());
        for value in domain {
            if !unique.iter().any(|u| u.loosely_eq(&value)) {
                unique.push(value);
            }
        }

        let aligned = if range.is_empty() {
            Vec::new()
        } else {
            (0..unique.len())
                .map(|i| range[i % range.len()].clone())
                .collect()
        };

        Self {
            scale_type,
            domain: unique,
            range: aligned,
        }
    }

    /// Domain values in order.
    pub fn domain(&self) -> &[ScaleValue] {
        &self.domain
    }

    /// Range values aligned with [`domain`](Self::domain).
    pub fn range(&self) -> &[ScaleValue] {
        &self.range
    }

    /// Output for `value`.
    ///
    /// Values outside the domain map to the first range entry. Returns
    /// `None` only when the range is empty.
    pub fn lookup(&self, value: &ScaleValue) -> Option<&ScaleValue> {
        self.domain
            .iter()
            .position(|d| d.loosely_eq(value))
            .and_then(|i| self.range.get(i))
            .or_else(|| self.range.first())
    }

    /// Number of domain values.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}

/// A channel's field resolved to a scale.
///
/// An empty scale means the field had no usable values and the channel
/// falls back to its constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelResolution {
    /// Field driving the channel.
    pub field: String,
    /// Domain-to-output lookup.
    pub scale: ResolvedScale,
    /// Correction applied to the user domain.
    pub case: DomainCase,
    /// Palette used, for color channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Problems met while resolving.
    #[serde(default)]
    pub warnings: Vec<EncodingWarning>,
}

impl ChannelResolution {
    /// Whether the channel ended up bound to its field.
    pub fn is_encoded(&self) -> bool {
        !self.scale.is_empty() && !self.scale.range().is_empty()
    }
}

// ============================================================================
// Size scales
// ============================================================================

/// A built size scale.
#[derive(Clone, Debug)]
pub struct SizeScale {
    /// Domain-to-size lookup.
    pub scale: ResolvedScale,
    /// Problems met while building.
    pub warnings: Vec<EncodingWarning>,
}

/// Build a size scale over `domain`.
///
/// A range of exactly two numbers, or none at all (`default_extent`), is an
/// extent the domain is spread over. Continuous types place numeric domains
/// by value after a `sqrt` or `log` transform; everything else is placed by
/// rank. Longer numeric ranges are used literally and wrap when short.
pub fn create_size_scale(
    domain: Vec<ScaleValue>,
    scale_type: ScaleType,
    range: Option<&RangeSpec>,
    default_extent: (f64, f64),
) -> SizeScale {
    let n = domain.len();
    let mut warnings = Vec::new();

    let numbers: Vec<f64> = match range {
        Some(RangeSpec::Values(values)) => values.iter().filter_map(ScaleValue::as_number).collect(),
        _ => Vec::new(),
    };

    let sizes: Vec<ScaleValue> = if numbers.len() > 2 {
        if numbers.len() < n {
            warnings.push(EncodingWarning::RangeLengthMismatch {
                domain_len: n,
                range_len: numbers.len(),
            });
        }
        numbers.into_iter().map(ScaleValue::Number).collect()
    } else {
        let (lo, hi) = match numbers.as_slice() {
            [lo, hi] => (*lo, *hi),
            _ => default_extent,
        };
        positions(&domain, scale_type)
            .into_iter()
            .map(|t| ScaleValue::Number(lo + (hi - lo) * t))
            .collect()
    };

    for warning in &warnings {
        warning.log();
    }

    SizeScale {
        scale: ResolvedScale::new(scale_type, domain, sizes),
        warnings,
    }
}

/// Position of each domain value in `[0, 1]`.
fn positions(domain: &[ScaleValue], scale_type: ScaleType) -> Vec<f64> {
    let n = domain.len();
    let by_rank = || -> Vec<f64> {
        match n {
            1 => vec![0.5],
            _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
        }
    };

    if !scale_type.is_continuous() {
        return by_rank();
    }
    let Some(values) = domain
        .iter()
        .map(ScaleValue::as_number)
        .collect::<Option<Vec<f64>>>()
    else {
        return by_rank();
    };

    let transform: fn(f64) -> f64 = match scale_type {
        ScaleType::Sqrt => |v: f64| v.max(0.0).sqrt(),
        ScaleType::Log if values.iter().all(|v| *v > 0.0) => f64::ln,
        _ => |v: f64| v,
    };
    let transformed: Vec<f64> = values.into_iter().map(transform).collect();

    let min = transformed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = transformed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![0.5; n];
    }
    transformed.iter().map(|v| (v - min) / (max - min)).collect()
}

// ============================================================================
// Tests
// ============================================================================

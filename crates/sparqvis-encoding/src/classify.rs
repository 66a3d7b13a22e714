//! Classification-field detection.
//!
//! When an encoding does not say what to color nodes by, the field that
//! best splits the nodes into a handful of readable categories is chosen.
//! Field names are matched against keyword tiers first; the best tier wins,
//! then the unique count closest to the ideal. Remaining ties go to the
//! lowest coverage (unique values over total values), i.e. the field whose
//! values repeat most.

use crate::domain::{DataRecord, FieldStats};
use serde::{Deserialize, Serialize};
use sparqvis_core::ReservedField;
use sparqvis_core::config::ClassificationConfig;

/// Keyword tiers, best first.
pub const KEYWORD_TIERS: &[&[&str]] = &[
    &["class", "category"],
    &["type", "kind"],
    &["level", "rank"],
    &["domain"],
    &["namespace"],
    &["source"],
    &["label", "name"],
];

/// The field picked to color nodes by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Field name.
    pub field: String,
    /// Why it was picked.
    pub reason: String,
}

/// Suitability figures of one candidate field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldProfile {
    /// Field name.
    pub field: String,
    /// Best keyword tier matched, if any.
    pub tier: Option<usize>,
    /// Value statistics.
    pub stats: FieldStats,
    /// Mean length of the values.
    pub average_length: f64,
    /// Share of values that are long URIs.
    pub uri_ratio: f64,
}

impl FieldProfile {
    /// Measure `field` over `records`.
    pub fn measure(records: &[DataRecord], field: &str, config: &ClassificationConfig) -> Self {
        let stats = FieldStats::collect(records, field);

        let mut total_length = 0usize;
        let mut long_uris = 0usize;
        let mut count = 0usize;
        for value in records.iter().filter_map(|r| r.get(field)) {
            if value.is_empty() {
                continue;
            }
            let text = value.as_text();
            count += 1;
            total_length += text.chars().count();
            if is_uri(&text) && text.len() >= config.long_uri_length {
                long_uris += 1;
            }
        }

        let (average_length, uri_ratio) = if count > 0 {
            (
                total_length as f64 / count as f64,
                long_uris as f64 / count as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            field: field.to_string(),
            tier: keyword_tier(field),
            stats,
            average_length,
            uri_ratio,
        }
    }

    /// Whether values read well as category labels.
    pub fn is_readable(&self, config: &ClassificationConfig) -> bool {
        self.average_length < config.max_average_length && self.uri_ratio < config.max_uri_ratio
    }

    /// Whether the field can drive a categorical color scale.
    pub fn is_viable(&self, config: &ClassificationConfig) -> bool {
        self.is_readable(config)
            && self.stats.unique_count >= 2
            && self.stats.unique_count <= config.max_categories
    }

    fn distance(&self, config: &ClassificationConfig) -> usize {
        self.stats.unique_count.abs_diff(config.ideal_unique_count)
    }
}

/// Best keyword tier `field` matches, by substring, case-insensitively.
pub fn keyword_tier(field: &str) -> Option<usize> {
    let lower = field.to_lowercase();
    KEYWORD_TIERS
        .iter()
        .position(|keywords| keywords.iter().any(|k| lower.contains(k)))
}

/// Pick the field to color nodes by.
///
/// Candidates rank by keyword tier, then distance of the unique count from
/// the ideal, then ascending coverage. Reserved fields are not candidates.
/// When no candidate qualifies, the term-kind pseudo-field `type` is
/// returned.
pub fn detect_classification_field(
    records: &[DataRecord],
    available_fields: &[String],
    config: &ClassificationConfig,
) -> Classification {
    let viable: Vec<FieldProfile> = available_fields
        .iter()
        .filter(|f| !ReservedField::is_reserved(f))
        .map(|f| FieldProfile::measure(records, f, config))
        .filter(|p| p.is_viable(config))
        .collect();

    let rank = |a: &&FieldProfile, b: &&FieldProfile| {
        a.tier
            .cmp(&b.tier)
            .then(a.distance(config).cmp(&b.distance(config)))
            // ascending: denser repetition wins
            .then(a.stats.coverage.total_cmp(&b.stats.coverage))
    };

    let keyword_match = viable.iter().filter(|p| p.tier.is_some()).min_by(rank);
    if let Some(best) = keyword_match {
        let tier = best.tier.unwrap_or_default();
        return Classification {
            field: best.field.clone(),
            reason: format!(
                "keyword tier {} ({}), {} distinct values",
                tier + 1,
                KEYWORD_TIERS[tier].join("/"),
                best.stats.unique_count
            ),
        };
    }

    if let Some(best) = viable.iter().min_by(rank) {
        return Classification {
            field: best.field.clone(),
            reason: format!("{} distinct values", best.stats.unique_count),
        };
    }

    Classification {
        field: ReservedField::Type.as_str().to_string(),
        reason: "no field qualifies; coloring by term kind".to_string(),
    }
}

fn is_uri(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("urn:")
}

// ============================================================================
// Tests
// ============================================================================

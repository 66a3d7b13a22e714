//! Domain resolution.
//!
//! A user-supplied domain is checked against the values actually present
//! in the data:
//!
//! | Case        | When                                   | Result                         |
//! |-------------|----------------------------------------|--------------------------------|
//! | `Extracted` | no user domain                         | data values, sorted            |
//! | `Fixed`     | no user value occurs in the data       | data values, sorted            |
//! | `Completed` | some data values missing from the user | user order, missing appended   |
//! | `Kept`      | user domain covers the data            | user domain                    |
//!
//! Values are compared loosely (see [`ScaleValue::loosely_eq`]).

use crate::EncodingWarning;
use serde::{Deserialize, Serialize};
use sparqvis_core::{ScaleType, ScaleValue};
use std::collections::{HashMap, HashSet};

/// One node's values, keyed by field name.
pub type DataRecord = HashMap<String, ScaleValue>;

/// Which correction was applied to the user domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainCase {
    /// No user domain; values were extracted from the data.
    Extracted,
    /// The user domain matched nothing and was replaced.
    Fixed,
    /// Missing data values were appended to the user domain.
    Completed,
    /// The user domain was used as given.
    Kept,
}

/// Outcome of [`resolve_domain`].
#[derive(Clone, Debug, PartialEq)]
pub struct DomainResolution {
    /// Ordered, duplicate-free domain.
    pub domain: Vec<ScaleValue>,
    /// Correction applied.
    pub case: DomainCase,
    /// Duplicate or empty-domain warnings.
    pub warnings: Vec<EncodingWarning>,
}

/// Value statistics of one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Distinct values in first-seen order.
    pub unique_values: Vec<ScaleValue>,
    /// Number of distinct values.
    pub unique_count: usize,
    /// Number of records carrying a value.
    pub total_count: usize,
    /// `unique_count / total_count`, zero without values.
    pub coverage: f64,
}

impl FieldStats {
    /// Collect statistics of `field` over `records`.
    ///
    /// Missing and empty values are skipped.
    pub fn collect(records: &[DataRecord], field: &str) -> Self {
        let mut seen = HashSet::new();
        let mut unique_values = Vec::new();
        let mut total_count = 0;

        for value in records.iter().filter_map(|r| r.get(field)) {
            if value.is_empty() {
                continue;
            }
            total_count += 1;
            if seen.insert(value.as_text().into_owned()) {
                unique_values.push(value.clone());
            }
        }

        let unique_count = unique_values.len();
        let coverage = if total_count > 0 {
            unique_count as f64 / total_count as f64
        } else {
            0.0
        };

        Self {
            unique_values,
            unique_count,
            total_count,
            coverage,
        }
    }
}

// ============================================================================
// Pure resolution
// ============================================================================

/// Sort values for a scale of `scale_type`.
///
/// Ordinal scales sort naturally; every other type sorts numerically with
/// non-numeric values last. The sort is stable.
pub fn sort_domain(values: &mut [ScaleValue], scale_type: ScaleType) {
    match scale_type {
        ScaleType::Ordinal => values.sort_by(|a, b| a.natural_cmp(b)),
        _ => values.sort_by(|a, b| a.numeric_cmp(b)),
    }
}

/// Resolve the domain of `field` given an optional user domain.
pub fn resolve_domain(
    records: &[DataRecord],
    field: &str,
    user_domain: Option<&[ScaleValue]>,
    scale_type: ScaleType,
) -> DomainResolution {
    resolve_with_stats(&FieldStats::collect(records, field), field, user_domain, scale_type)
}

fn resolve_with_stats(
    stats: &FieldStats,
    field: &str,
    user_domain: Option<&[ScaleValue]>,
    scale_type: ScaleType,
) -> DomainResolution {
    let extracted = &stats.unique_values;
    let mut warnings = Vec::new();

    let sorted_extracted = || {
        let mut values = extracted.clone();
        sort_domain(&mut values, scale_type);
        values
    };

    let user = match user_domain {
        Some(domain) if !domain.is_empty() => dedupe(domain, field, &mut warnings),
        _ => Vec::new(),
    };

    let (domain, case) = if user.is_empty() {
        (sorted_extracted(), DomainCase::Extracted)
    } else if !user
        .iter()
        .any(|u| extracted.iter().any(|e| u.loosely_eq(e)))
    {
        (sorted_extracted(), DomainCase::Fixed)
    } else {
        let mut missing: Vec<ScaleValue> = extracted
            .iter()
            .filter(|e| !user.iter().any(|u| u.loosely_eq(e)))
            .cloned()
            .collect();
        if missing.is_empty() {
            (user, DomainCase::Kept)
        } else {
            sort_domain(&mut missing, scale_type);
            let mut completed = user;
            completed.extend(missing);
            (completed, DomainCase::Completed)
        }
    };

    if domain.is_empty() {
        warnings.push(EncodingWarning::EmptyDomain {
            field: field.to_string(),
        });
    }

    DomainResolution {
        domain,
        case,
        warnings,
    }
}

/// Drop repeated values, keeping the first occurrence.
fn dedupe(
    domain: &[ScaleValue],
    field: &str,
    warnings: &mut Vec<EncodingWarning>,
) -> Vec<ScaleValue> {
    let mut unique: Vec<ScaleValue> = Vec::with_capacity(domain.len());
    for value in domain {
        if unique.iter().any(|u| u.loosely_eq(value)) {
            warnings.push(EncodingWarning::DuplicateDomainValue {
                field: field.to_string(),
                value: value.to_string(),
            });
        } else {
            unique.push(value.clone());
        }
    }
    unique
}

// ============================================================================
// Calculator
// ============================================================================

/// Resolves domains and remembers per-field statistics.
#[derive(Debug, Default)]
pub struct DomainCalculator {
    stats: HashMap<String, FieldStats>,
}

impl DomainCalculator {
    /// Create a calculator with an empty statistics cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the domain of `field` and record its statistics.
    pub fn get_domain(
        &mut self,
        records: &[DataRecord],
        field: &str,
        user_domain: Option<&[ScaleValue]>,
        scale_type: ScaleType,
    ) -> DomainResolution {
        let stats = FieldStats::collect(records, field);
        let resolution = resolve_with_stats(&stats, field, user_domain, scale_type);
        self.stats.insert(field.to_string(), stats);
        resolution
    }

    /// Statistics recorded for `field` by the last [`get_domain`](Self::get_domain) call.
    pub fn field_stats(&self, field: &str) -> Option<&FieldStats> {
        self.stats.get(field)
    }

    /// Forget all statistics.
    pub fn clear(&mut self) {
        self.stats.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

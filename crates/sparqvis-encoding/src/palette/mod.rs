//! Color scheme resolution.
//!
//! A range may name a palette instead of listing colors. Names take the form
//! `Identifier` or `Identifier[n]`, where `n` selects the `n`-color variant
//! of a multi-variant scheme (`Blues[5]`). Names are matched against the
//! [`REGISTRY`] in TitleCase, UPPERCASE, as given, then lowercase, and
//! finally without regard to case.

pub mod catalog;

pub use catalog::{Interpolator, REGISTRY, Registry, Scheme};

use crate::EncodingWarning;
use crate::scale::ResolvedScale;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sparqvis_core::{RangeSpec, ScaleType, ScaleValue};
use std::sync::LazyLock;

/// Palette name reported for literal color lists.
pub const CUSTOM: &str = "custom";

static SCHEME_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9]*)\s*(?:\[\s*(\d+)\s*\])?\s*$")
        .expect("scheme name pattern is valid")
});

// ============================================================================
// Scheme references
// ============================================================================

/// Whether a reference resolved to a fixed scheme or a continuous ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// Continuous ramp, sampled to the domain length.
    Interpolator,
    /// Fixed color list.
    Scheme,
}

/// A palette name resolved against the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeReference {
    /// Resolution target.
    pub kind: SchemeKind,
    /// Registry name matched.
    pub resolved: String,
    /// Name as written.
    pub raw: String,
    /// Requested variant length, if any.
    pub index: Option<usize>,
}

impl SchemeReference {
    /// Colors for a domain of `count` values.
    ///
    /// Interpolators are sampled to `count`. Schemes return the requested
    /// variant when it exists, the longest variant otherwise.
    pub fn colors(&self, count: usize) -> Vec<String> {
        match self.kind {
            SchemeKind::Interpolator => REGISTRY
                .interpolator(&self.resolved)
                .map(|i| i.sample(count.max(1)))
                .unwrap_or_default(),
            SchemeKind::Scheme => REGISTRY
                .scheme(&self.resolved)
                .map(|s| {
                    self.index
                        .and_then(|n| s.variant(n))
                        .unwrap_or_else(|| s.longest())
                        .iter()
                        .map(|c| c.to_string())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Resolve a palette name for a scale of `scale_type`.
///
/// Continuous scale types only consider interpolators, ordinal scales only
/// consider schemes. Returns `None` when nothing matches.
pub fn parse_scheme_reference(name: &str, scale_type: ScaleType) -> Option<SchemeReference> {
    let captures = SCHEME_NAME.captures(name)?;
    let identifier = captures.get(1)?.as_str();
    let index = captures.get(2).and_then(|m| m.as_str().parse().ok());

    let kind = if scale_type.is_continuous() {
        SchemeKind::Interpolator
    } else {
        SchemeKind::Scheme
    };

    let names = match kind {
        SchemeKind::Interpolator => REGISTRY.interpolator_names(),
        SchemeKind::Scheme => REGISTRY.scheme_names(),
    };
    let resolved = name_candidates(identifier)
        .into_iter()
        .find(|candidate| names.contains(&candidate.as_str()))
        .or_else(|| {
            // mixed-case names such as RdBu
            names
                .iter()
                .find(|n| n.eq_ignore_ascii_case(identifier))
                .map(|n| n.to_string())
        })?;

    Some(SchemeReference {
        kind,
        resolved,
        raw: name.to_string(),
        index,
    })
}

fn name_candidates(identifier: &str) -> [String; 4] {
    let mut chars = identifier.chars();
    let title: String = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    };
    [
        title,
        identifier.to_uppercase(),
        identifier.to_string(),
        identifier.to_lowercase(),
    ]
}

// ============================================================================
// Fallbacks
// ============================================================================

/// A palette chosen when the encoding names none.
#[derive(Clone, Debug, PartialEq)]
pub struct Fallback {
    /// Palette description.
    pub name: String,
    /// Colors for the domain.
    pub colors: Vec<String>,
}

/// Best built-in palette for a domain of `domain_size` values.
///
/// Continuous scales use Viridis. Ordinal scales use Category10 up to ten
/// values, Paired up to twelve, and evenly spaced Turbo samples beyond.
pub fn get_best_fallback(scale_type: ScaleType, domain_size: usize) -> Fallback {
    let sampled = |name: &str| Fallback {
        name: name.to_string(),
        colors: REGISTRY
            .interpolator(name)
            .map(|i| i.sample(domain_size.max(1)))
            .unwrap_or_default(),
    };
    let scheme = |name: &str| Fallback {
        name: name.to_string(),
        colors: REGISTRY
            .scheme(name)
            .map(|s| s.longest().iter().map(|c| c.to_string()).collect())
            .unwrap_or_default(),
    };

    if scale_type.is_continuous() {
        sampled("Viridis")
    } else if domain_size <= 10 {
        scheme("Category10")
    } else if domain_size <= 12 {
        scheme("Paired")
    } else {
        sampled("Turbo")
    }
}

// ============================================================================
// Color scales
// ============================================================================

/// Inputs of [`create_color_scale`].
#[derive(Clone, Debug)]
pub struct ColorScaleRequest<'a> {
    /// Resolved domain.
    pub domain: Vec<ScaleValue>,
    /// Range as written in the encoding.
    pub range: Option<&'a RangeSpec>,
    /// Scale type.
    pub scale_type: ScaleType,
    /// Palette name used when `range` is absent.
    pub fallback: Option<&'a str>,
}

/// A built color scale.
#[derive(Clone, Debug)]
pub struct ColorScale {
    /// Domain-to-color lookup.
    pub scale: ResolvedScale,
    /// Palette used: a registry name or `"custom"` for literal colors.
    pub palette: String,
    /// Problems met while building.
    pub warnings: Vec<EncodingWarning>,
}

/// Build a color scale for `request.domain`.
///
/// A range that is a string, or a one-element list holding a string that is
/// not itself a color, is read as a palette name. Unknown names fall back to
/// [`get_best_fallback`] with a warning, and so do empty lists.
///
/// Literal color lists on continuous scales are stops of a ramp sampled to
/// the domain length. On ordinal scales they are used as given and wrap
/// around, with a warning, when shorter than the domain.
pub fn create_color_scale(request: ColorScaleRequest<'_>) -> ColorScale {
    let ColorScaleRequest {
        domain,
        range,
        scale_type,
        fallback,
    } = request;
    let n = domain.len();
    let mut warnings = Vec::new();

    let (palette, colors): (String, Vec<ScaleValue>) = match range {
        None => {
            let reference = fallback.and_then(|name| parse_scheme_reference(name, scale_type));
            match reference {
                Some(r) => (r.resolved.clone(), texts(r.colors(n))),
                None => best(scale_type, n),
            }
        }
        Some(range) => match scheme_name(range) {
            Some(name) => match parse_scheme_reference(name, scale_type) {
                Some(r) => (r.resolved.clone(), texts(r.colors(n))),
                None => {
                    let (palette, colors) = best(scale_type, n);
                    warnings.push(EncodingWarning::UnresolvableSchemeName {
                        name: name.to_string(),
                        fallback: palette.clone(),
                    });
                    (palette, colors)
                }
            },
            None => match range {
                RangeSpec::Values(values) if values.is_empty() => {
                    let (palette, colors) = best(scale_type, n);
                    warnings.push(EncodingWarning::EmptyRange {
                        fallback: palette.clone(),
                    });
                    (palette, colors)
                }
                RangeSpec::Values(values) => {
                    let ramp = scale_type
                        .is_continuous()
                        .then(|| Interpolator::from_stops(&stop_texts(values)))
                        .flatten();
                    match ramp {
                        Some(ramp) => (CUSTOM.to_string(), texts(ramp.sample(n))),
                        None => (CUSTOM.to_string(), values.clone()),
                    }
                }
                RangeSpec::Scheme(_) => best(scale_type, n),
            },
        },
    };

    if !colors.is_empty() && colors.len() < n {
        warnings.push(EncodingWarning::RangeLengthMismatch {
            domain_len: n,
            range_len: colors.len(),
        });
    }
    for warning in &warnings {
        warning.log();
    }

    ColorScale {
        scale: ResolvedScale::new(scale_type, domain, colors),
        palette,
        warnings,
    }
}

fn stop_texts(values: &[ScaleValue]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn scheme_name(range: &RangeSpec) -> Option<&str> {
    match range {
        RangeSpec::Scheme(name) => Some(name),
        RangeSpec::Values(values) => match values.as_slice() {
            [ScaleValue::Text(name)] if !looks_like_color(name) => Some(name),
            _ => None,
        },
    }
}

fn looks_like_color(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    v.starts_with('#') || v.starts_with("rgb") || v.starts_with("hsl")
}

fn best(scale_type: ScaleType, n: usize) -> (String, Vec<ScaleValue>) {
    let fallback = get_best_fallback(scale_type, n);
    (fallback.name, texts(fallback.colors))
}

fn texts(colors: Vec<String>) -> Vec<ScaleValue> {
    colors.into_iter().map(ScaleValue::Text).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(n: usize) -> Vec<ScaleValue> {
        (0..n).map(|i| ScaleValue::from(format!("v{i}"))).collect()
    }

    // ------------------------------------------------------------------------
    // Scheme references
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_case_variants() {
        for name in ["category10", "CATEGORY10", "Category10", "cAtEgOrY10"] {
            let r = parse_scheme_reference(name, ScaleType::Ordinal).unwrap();
            assert_eq!(r.resolved, "Category10");
            assert_eq!(r.kind, SchemeKind::Scheme);
            assert_eq!(r.raw, name);
        }
    }

    #[test]
    fn test_parse_as_given_for_mixed_case_names() {
        let r = parse_scheme_reference("RdBu", ScaleType::Sequential).unwrap();
        assert_eq!(r.resolved, "RdBu");

        let r = parse_scheme_reference("rdbu", ScaleType::Sequential).unwrap();
        assert_eq!(r.resolved, "RdBu");
    }

    #[test]
    fn test_parse_indexed_variant() {
        let r = parse_scheme_reference("Blues[5]", ScaleType::Ordinal).unwrap();
        assert_eq!(r.index, Some(5));
        assert_eq!(r.colors(3).len(), 5);

        let r = parse_scheme_reference("blues[42]", ScaleType::Ordinal).unwrap();
        assert_eq!(r.colors(3).len(), 9);
    }

    #[test]
    fn test_continuous_only_matches_interpolators() {
        let r = parse_scheme_reference("viridis", ScaleType::Linear).unwrap();
        assert_eq!(r.kind, SchemeKind::Interpolator);
        assert_eq!(r.colors(7).len(), 7);

        assert!(parse_scheme_reference("Category10", ScaleType::Linear).is_none());
        assert!(parse_scheme_reference("Viridis", ScaleType::Ordinal).is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_scheme_reference("NoSuchScheme", ScaleType::Ordinal).is_none());
        assert!(parse_scheme_reference("Blues[", ScaleType::Ordinal).is_none());
        assert!(parse_scheme_reference("", ScaleType::Ordinal).is_none());
    }

    // ------------------------------------------------------------------------
    // Fallbacks
    // ------------------------------------------------------------------------

    #[test]
    fn test_best_fallback() {
        assert_eq!(get_best_fallback(ScaleType::Linear, 4).name, "Viridis");
        assert_eq!(get_best_fallback(ScaleType::Linear, 4).colors.len(), 4);
        assert_eq!(get_best_fallback(ScaleType::Ordinal, 10).name, "Category10");
        assert_eq!(get_best_fallback(ScaleType::Ordinal, 11).name, "Paired");
        let large = get_best_fallback(ScaleType::Ordinal, 30);
        assert_eq!(large.name, "Turbo");
        assert_eq!(large.colors.len(), 30);
    }

    // ------------------------------------------------------------------------
    // Color scales
    // ------------------------------------------------------------------------

    #[test]
    fn test_absent_range_uses_fallback() {
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(3),
            range: None,
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.palette, "Category10");
        assert_eq!(scale.scale.range().len(), 3);
        assert!(scale.warnings.is_empty());
    }

    #[test]
    fn test_named_fallback() {
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(3),
            range: None,
            scale_type: ScaleType::Ordinal,
            fallback: Some("Set1"),
        });
        assert_eq!(scale.palette, "Set1");
    }

    #[test]
    fn test_unresolvable_scheme_warns() {
        let range = RangeSpec::Scheme("Nope".into());
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(2),
            range: Some(&range),
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.palette, "Category10");
        assert_eq!(
            scale.warnings,
            vec![EncodingWarning::UnresolvableSchemeName {
                name: "Nope".into(),
                fallback: "Category10".into()
            }]
        );
    }

    #[test]
    fn test_single_element_list_is_scheme_name() {
        let range = RangeSpec::Values(vec![ScaleValue::text("Set2")]);
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(2),
            range: Some(&range),
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.palette, "Set2");
    }

    #[test]
    fn test_single_color_list_is_literal() {
        let range = RangeSpec::Values(vec![ScaleValue::text("#ff0000")]);
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(2),
            range: Some(&range),
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.palette, "custom");
        assert_eq!(scale.scale.lookup(&ScaleValue::text("v1")).unwrap().to_string(), "#ff0000");
        assert!(matches!(
            scale.warnings[0],
            EncodingWarning::RangeLengthMismatch { domain_len: 2, range_len: 1 }
        ));
    }

    #[test]
    fn test_literal_list_truncated() {
        let range = RangeSpec::Values(vec!["#a".into(), "#b".into(), "#c".into()]);
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(2),
            range: Some(&range),
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.scale.range().len(), 2);
        assert!(scale.warnings.is_empty());
    }

    #[test]
    fn test_empty_literal_list_falls_back() {
        let range = RangeSpec::Values(Vec::new());
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(3),
            range: Some(&range),
            scale_type: ScaleType::Ordinal,
            fallback: None,
        });
        assert_eq!(scale.palette, "Category10");
        assert_eq!(scale.scale.range().len(), 3);
        assert_eq!(
            scale.warnings,
            vec![EncodingWarning::EmptyRange {
                fallback: "Category10".into()
            }]
        );
    }

    #[test]
    fn test_continuous_literal_list_is_a_ramp() {
        let range = RangeSpec::Values(vec!["#000000".into(), "#ffffff".into()]);
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(5),
            range: Some(&range),
            scale_type: ScaleType::Linear,
            fallback: None,
        });
        let colors: Vec<String> = scale.scale.range().iter().map(ToString::to_string).collect();
        assert_eq!(scale.palette, CUSTOM);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], "#000000");
        assert_eq!(colors[2], "#808080");
        assert_eq!(colors[4], "#ffffff");
        assert!(scale.warnings.is_empty());
    }

    #[test]
    fn test_continuous_list_of_names_wraps() {
        let range = RangeSpec::Values(vec!["red".into(), "blue".into()]);
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(3),
            range: Some(&range),
            scale_type: ScaleType::Linear,
            fallback: None,
        });
        assert_eq!(scale.scale.range()[2].to_string(), "red");
        assert_eq!(scale.warnings.len(), 1);
    }

    #[test]
    fn test_scheme_name_pattern() {
        assert!(SCHEME_NAME.is_match("Blues[5]"));
        assert!(SCHEME_NAME.is_match(" viridis "));
        assert!(!SCHEME_NAME.is_match("#ff0000"));
    }

    #[test]
    fn test_interpolator_sampled_to_domain() {
        let range = RangeSpec::Scheme("Blues".into());
        let scale = create_color_scale(ColorScaleRequest {
            domain: domain(6),
            range: Some(&range),
            scale_type: ScaleType::Sequential,
            fallback: None,
        });
        assert_eq!(scale.scale.range().len(), 6);
        assert_eq!(scale.scale.range()[0].to_string(), "#f7fbff");
        assert_eq!(scale.scale.range()[5].to_string(), "#08306b");
    }
}

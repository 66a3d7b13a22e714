//! Encoding validation.
//!
//! Checks an encoding spec against the fields a result set projects before
//! any transformation runs. Every check runs; errors make the encoding unusable
//! for the cycle, warnings and informational findings do not.

use serde::{Deserialize, Serialize};
use sparqvis_core::{ChannelEncoding, EncodingSpec, LinkField, ReservedField, ScaleValue};
use std::collections::HashSet;

// ============================================================================
// Types
// ============================================================================

/// Result of encoding validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the encoding can drive a transformation (no errors).
    pub valid: bool,
    /// Violations that reject the encoding.
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal problems.
    pub warnings: Vec<ValidationIssue>,
    /// Informational findings.
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Add an error (marks the encoding as invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Add an informational finding.
    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Error messages in check order.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|i| i.message.as_str()).collect()
    }

    /// Whether an issue with `code` was reported at any level.
    pub fn has_code(&self, code: &str) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .any(|i| i.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation issue found in the encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Fields the issue is about.
    pub fields: Vec<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Attach affected fields.
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate `spec` against the projected `available_fields`.
///
/// Checks:
/// - `nodes.field` is present, non-empty and every entry is available or
///   reserved
/// - `links.field` names an available field or an available
///   `{source, target}` pair
/// - semantic links have at least one node field
/// - color and size fields are available or reserved
/// - scale domains do not repeat values (warning)
pub fn validate_encoding(spec: &EncodingSpec, available_fields: &[String]) -> ValidationResult {
    let available = Available::new(available_fields);
    let mut result = ValidationResult::new();

    check_node_fields(spec, &available, &mut result);
    check_link_field(spec, &available, &mut result);
    check_channel(
        spec.nodes.color.as_ref(),
        "color",
        "UNKNOWN_COLOR_FIELD",
        &available,
        &mut result,
    );
    check_channel(
        spec.nodes.size.as_ref(),
        "size",
        "UNKNOWN_SIZE_FIELD",
        &available,
        &mut result,
    );

    if !result.valid {
        log::debug!("encoding rejected: {}", result.messages().join("; "));
    }
    result
}

/// Quick check if the encoding has any validation errors.
pub fn is_valid_encoding(spec: &EncodingSpec, available_fields: &[String]) -> bool {
    validate_encoding(spec, available_fields).valid
}

struct Available<'a> {
    fields: HashSet<&'a str>,
}

impl<'a> Available<'a> {
    fn new(fields: &'a [String]) -> Self {
        Self {
            fields: fields.iter().map(String::as_str).collect(),
        }
    }

    fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    fn contains_or_reserved(&self, field: &str) -> bool {
        self.contains(field) || ReservedField::is_reserved(field)
    }
}

// ============================================================================
// Individual checks
// ============================================================================

fn check_node_fields(spec: &EncodingSpec, available: &Available<'_>, result: &mut ValidationResult) {
    let fields = spec.node_fields();
    if fields.is_empty() {
        result.add_error(ValidationIssue::new(
            "NODE_FIELD_MISSING",
            "nodes.field must list at least one field",
        ));
        return;
    }

    let unknown: Vec<String> = fields
        .iter()
        .filter(|f| !available.contains_or_reserved(f))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "UNKNOWN_NODE_FIELD",
                format!(
                    "nodes.field references unknown field(s): {}",
                    unknown.join(", ")
                ),
            )
            .with_fields(unknown),
        );
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = fields
        .iter()
        .filter(|f| !seen.insert(f.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "DUPLICATE_NODE_FIELD",
                format!("nodes.field repeats: {}", duplicates.join(", ")),
            )
            .with_fields(duplicates),
        );
    }
}

fn check_link_field(spec: &EncodingSpec, available: &Available<'_>, result: &mut ValidationResult) {
    match &spec.links.field {
        None => {}
        Some(LinkField::Semantic(relation)) => {
            if !available.contains(relation) {
                result.add_error(
                    ValidationIssue::new(
                        "UNKNOWN_LINK_FIELD",
                        format!("links.field references unknown field: {relation}"),
                    )
                    .with_fields(vec![relation.clone()]),
                );
            }

            match spec.node_fields().len() {
                0 => result.add_error(ValidationIssue::new(
                    "SEMANTIC_WITHOUT_NODES",
                    "semantic links need at least one node field",
                )),
                1 => result.add_info(
                    ValidationIssue::new(
                        "COOCCURRENCE_MODE",
                        format!(
                            "one node field with semantic links: nodes sharing a value of '{relation}' are linked"
                        ),
                    )
                    .with_fields(vec![relation.clone()]),
                ),
                _ => {}
            }
        }
        Some(LinkField::Directional { source, target }) => {
            let unknown: Vec<String> = [source, target]
                .into_iter()
                .filter(|f| !available.contains(f))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                result.add_error(
                    ValidationIssue::new(
                        "UNKNOWN_LINK_FIELD",
                        format!(
                            "links.field source/target reference unknown field(s): {}",
                            unknown.join(", ")
                        ),
                    )
                    .with_fields(unknown),
                );
            }
        }
        Some(LinkField::Invalid(value)) => {
            result.add_error(ValidationIssue::new(
                "INVALID_LINK_FIELD_SHAPE",
                format!(
                    "links.field must be a field name or a {{source, target}} object, got {value}"
                ),
            ));
        }
    }
}

fn check_channel(
    channel: Option<&ChannelEncoding>,
    name: &str,
    unknown_code: &str,
    available: &Available<'_>,
    result: &mut ValidationResult,
) {
    let Some(channel) = channel else {
        return;
    };

    if let Some(field) = &channel.field {
        if !available.contains_or_reserved(field) {
            result.add_error(
                ValidationIssue::new(
                    unknown_code,
                    format!("nodes.{name}.field references unknown field: {field}"),
                )
                .with_fields(vec![field.clone()]),
            );
        }
    }

    let Some(domain) = channel.scale.as_ref().and_then(|s| s.domain.as_ref()) else {
        return;
    };
    let repeated = repeated_values(domain);
    if !repeated.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "DUPLICATE_DOMAIN_VALUE",
                format!(
                    "nodes.{name}.scale.domain repeats: {}",
                    repeated.join(", ")
                ),
            )
            .with_fields(channel.field.iter().cloned().collect()),
        );
    }
}

fn repeated_values(domain: &[ScaleValue]) -> Vec<String> {
    let mut repeated = Vec::new();
    for (i, value) in domain.iter().enumerate() {
        if domain[..i].iter().any(|prev| prev.loosely_eq(value)) {
            repeated.push(value.to_string());
        }
    }
    repeated
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sparqvis_core::ScaleConfig;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn spec(value: serde_json::Value) -> EncodingSpec {
        serde_json::from_value(value).unwrap()
    }

    // ------------------------------------------------------------------------
    // Node fields
    // ------------------------------------------------------------------------

    #[test]
    fn test_valid_directional_spec() {
        let spec = spec(json!({
            "nodes": {"field": ["s"], "color": {"field": "type"}, "size": {"field": "links"}},
            "links": {"field": {"source": "s", "target": "o"}}
        }));
        let result = validate_encoding(&spec, &fields(&["s", "p", "o"]));
        assert!(result.valid);
        assert_eq!(result.total_issues(), 0);
    }

    #[test]
    fn test_missing_node_field() {
        let result = validate_encoding(&spec(json!({"nodes": {}})), &fields(&["s"]));
        assert!(!result.valid);
        assert!(result.has_code("NODE_FIELD_MISSING"));

        let result =
            validate_encoding(&spec(json!({"nodes": {"field": []}})), &fields(&["s"]));
        assert!(result.has_code("NODE_FIELD_MISSING"));
    }

    #[test]
    fn test_unknown_node_field() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s", "zzz"]}})),
            &fields(&["s"]),
        );
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, "UNKNOWN_NODE_FIELD");
        assert_eq!(result.errors[0].fields, vec!["zzz"]);
    }

    #[test]
    fn test_reserved_node_field_allowed() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s", "connections"]}})),
            &fields(&["s"]),
        );
        assert!(result.valid);
    }

    #[test]
    fn test_duplicate_node_field_warns() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s", "s"]}})),
            &fields(&["s"]),
        );
        assert!(result.valid);
        assert!(result.has_code("DUPLICATE_NODE_FIELD"));
    }

    // ------------------------------------------------------------------------
    // Link field
    // ------------------------------------------------------------------------

    #[test]
    fn test_unknown_semantic_link_field() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s", "o"]}, "links": {"field": "nope"}})),
            &fields(&["s", "p", "o"]),
        );
        assert!(!result.valid);
        assert!(result.has_code("UNKNOWN_LINK_FIELD"));
    }

    #[test]
    fn test_directional_link_field_requires_both() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s"]}, "links": {"field": {"source": "s", "target": "x"}}})),
            &fields(&["s", "o"]),
        );
        assert!(!result.valid);
        assert_eq!(result.errors[0].fields, vec!["x"]);
    }

    #[test]
    fn test_invalid_link_field_shape() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s"]}, "links": {"field": [1, 2]}})),
            &fields(&["s"]),
        );
        assert!(!result.valid);
        assert!(result.has_code("INVALID_LINK_FIELD_SHAPE"));
    }

    #[test]
    fn test_single_node_field_semantic_is_info() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s"]}, "links": {"field": "p"}})),
            &fields(&["s", "p"]),
        );
        assert!(result.valid);
        assert_eq!(result.info.len(), 1);
        assert_eq!(result.info[0].code, "COOCCURRENCE_MODE");
    }

    #[test]
    fn test_semantic_without_nodes() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": []}, "links": {"field": "p"}})),
            &fields(&["s", "p"]),
        );
        assert!(result.has_code("SEMANTIC_WITHOUT_NODES"));
        assert!(result.has_code("NODE_FIELD_MISSING"));
    }

    // ------------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------------

    #[test]
    fn test_unknown_color_and_size_fields() {
        let result = validate_encoding(
            &spec(json!({"nodes": {"field": ["s"], "color": {"field": "c"}, "size": {"field": "z"}}})),
            &fields(&["s"]),
        );
        assert!(!result.valid);
        assert!(result.has_code("UNKNOWN_COLOR_FIELD"));
        assert!(result.has_code("UNKNOWN_SIZE_FIELD"));
    }

    #[test]
    fn test_all_checks_run() {
        let result = validate_encoding(
            &spec(json!({
                "nodes": {"field": ["zzz"], "color": {"field": "c"}},
                "links": {"field": 3}
            })),
            &fields(&["s"]),
        );
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.messages().len(), 3);
    }

    #[test]
    fn test_duplicate_domain_value_warns() {
        let mut spec = spec(json!({"nodes": {"field": ["s"]}}));
        spec.nodes.color = Some(
            ChannelEncoding::field("s").with_scale(
                ScaleConfig::default()
                    .with_domain(vec!["a".into(), "b".into(), "a".into()]),
            ),
        );
        let result = validate_encoding(&spec, &fields(&["s"]));
        assert!(result.valid);
        assert!(result.has_code("DUPLICATE_DOMAIN_VALUE"));
        assert!(result.warnings[0].message.ends_with("a"));
    }

    #[test]
    fn test_is_valid_encoding() {
        let spec = spec(json!({"nodes": {"field": ["s"]}}));
        assert!(is_valid_encoding(&spec, &fields(&["s"])));
        assert!(!is_valid_encoding(&spec, &fields(&["o"])));
    }
}

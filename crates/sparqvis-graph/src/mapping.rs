//! Field mapping resolution.
//!
//! Decides which result-set fields act as link source and target, and
//! which kind of link applies, from an encoding spec and the projected
//! fields.

use crate::LinkKind;
use serde::{Deserialize, Serialize};
use sparqvis_core::{EncodingSpec, Error, LinkField, Result};

/// Resolved roles of the result-set fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field whose values become the primary nodes.
    pub source_field: String,
    /// Field whose values become link targets. `None` in co-occurrence mode.
    pub target_field: Option<String>,
    /// Kind of link produced per row.
    pub link_kind: LinkKind,
    /// Field labelling semantic links or grouping co-occurrences.
    pub relation_field: Option<String>,
}

impl FieldMapping {
    /// Directional mapping between two fields.
    pub fn directional(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_field: source.into(),
            target_field: Some(target.into()),
            link_kind: LinkKind::Directional,
            relation_field: None,
        }
    }

    /// Semantic mapping; `target` of `None` selects co-occurrence.
    pub fn semantic(
        source: impl Into<String>,
        target: Option<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source.into(),
            target_field: target,
            link_kind: LinkKind::Semantic,
            relation_field: Some(relation.into()),
        }
    }

    /// Whether links must be inferred from shared relation values.
    pub fn is_cooccurrence(&self) -> bool {
        self.link_kind == LinkKind::Semantic && self.target_field.is_none()
    }
}

/// Resolve the field mapping for a transformation.
///
/// Defaults to a directional mapping from the first to the second field.
/// `nodes.field[0]` overrides the source. A `{source, target}` link field
/// whose names are both available overrides both ends. A string link field
/// naming an available field selects semantic mode: two or more node fields
/// become source and target, a single node field leaves the target empty so
/// the caller falls back to co-occurrence links.
pub fn resolve_field_mapping(
    spec: Option<&EncodingSpec>,
    available_fields: &[String],
) -> Result<FieldMapping> {
    let Some(first) = available_fields.first() else {
        return Err(Error::invalid_data("result set has no fields"));
    };

    let mut mapping = FieldMapping {
        source_field: first.clone(),
        target_field: available_fields.get(1).cloned(),
        link_kind: LinkKind::Directional,
        relation_field: None,
    };

    let Some(spec) = spec else {
        return Ok(mapping);
    };

    let node_fields = spec.node_fields();
    if let Some(primary) = node_fields.first() {
        mapping.source_field = primary.clone();
    }

    let is_available = |name: &str| available_fields.iter().any(|f| f == name);

    match &spec.links.field {
        Some(LinkField::Directional { source, target }) => {
            if is_available(source.as_str()) && is_available(target.as_str()) {
                mapping.source_field = source.clone();
                mapping.target_field = Some(target.clone());
                mapping.link_kind = LinkKind::Directional;
            } else {
                log::warn!(
                    "ignoring directional link fields {source}->{target}: not in result set"
                );
            }
        }
        Some(LinkField::Semantic(relation)) if is_available(relation.as_str()) => {
            mapping.link_kind = LinkKind::Semantic;
            mapping.relation_field = Some(relation.clone());
            match node_fields {
                [] => {
                    return Err(Error::malformed_encoding(
                        "semantic links need at least one node field",
                    ));
                }
                [_] => mapping.target_field = None,
                [source, target, ..] => {
                    mapping.source_field = source.clone();
                    mapping.target_field = Some(target.clone());
                }
            }
        }
        Some(LinkField::Semantic(relation)) => {
            log::warn!("ignoring semantic link field '{relation}': not in result set");
        }
        Some(LinkField::Invalid(value)) => {
            log::warn!("ignoring link field with unsupported shape: {value}");
        }
        None => {}
    }

    Ok(mapping)
}

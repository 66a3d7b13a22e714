//! Result-set to graph transformation.
//!
//! Walks the rows once. Directional and semantic links are inserted per
//! row; co-occurrence links are inferred after every row has been seen.
//! Node degrees are recomputed at the end from the final link set.

use crate::cooccurrence::CooccurrenceCollector;
use crate::labels::resolve_label;
use crate::{FieldMapping, GraphData, Link, LinkKind, Node};
use sparqvis_core::{ResultSet, Result, Row, TermKind, TypedValue, extract_id};
use std::collections::BTreeMap;

/// Build the graph for `result_set` under `mapping`.
pub fn transform(result_set: &ResultSet, mapping: &FieldMapping) -> Result<GraphData> {
    let mut graph = GraphData::new();
    let mut collector = if mapping.is_cooccurrence() {
        mapping
            .relation_field
            .as_deref()
            .map(CooccurrenceCollector::new)
    } else {
        None
    };
    let mut skipped = 0usize;

    for row in result_set.rows() {
        let Some(source_id) = ensure_node(&mut graph, row, &mapping.source_field) else {
            skipped += 1;
            continue;
        };

        if let Some(collector) = collector.as_mut() {
            collector.observe(&source_id, row);
            continue;
        }

        let Some(target_field) = mapping.target_field.as_deref() else {
            continue;
        };
        let Some(target_id) = ensure_node(&mut graph, row, target_field) else {
            continue;
        };

        let mut link = Link::new(source_id, target_id, mapping.link_kind)
            .with_attributes(row_attributes(row));
        if mapping.link_kind == LinkKind::Semantic {
            if let Some(relation) = mapping.relation_field.as_ref().and_then(|f| row.get(f)) {
                link = link.with_label(relation_label(relation));
            }
        }
        graph.add_link(link)?;
    }

    if let Some(collector) = collector {
        let added = collector.apply(&mut graph)?;
        log::debug!(
            "inferred {added} co-occurrence link(s) from {} relation value(s)",
            collector.group_count()
        );
    }

    if skipped > 0 {
        log::debug!(
            "skipped {skipped} row(s) without a value for '{}'",
            mapping.source_field
        );
    }

    graph.recompute_degrees();
    log::debug!(
        "transformed {} row(s) into {} node(s) and {} link(s)",
        result_set.len(),
        graph.node_count(),
        graph.link_count()
    );
    Ok(graph)
}

/// Create the node for `field` in `row` on first sight; return its id.
fn ensure_node(graph: &mut GraphData, row: &Row, field: &str) -> Option<String> {
    let value = row.get(field)?;
    let id = extract_id(value);
    if id.is_empty() {
        return None;
    }

    if !graph.contains_node(&id) {
        graph.add_node(build_node(&id, row, field, value));
    }
    Some(id)
}

fn build_node(id: &str, row: &Row, field: &str, value: &TypedValue) -> Node {
    let mut node = Node::new(id, resolve_label(row, field, value)).with_kind(value.kind);
    if value.kind == TermKind::Uri {
        node.uri = Some(value.value.clone());
    }
    node.attributes = row_attributes(row);
    node
}

fn row_attributes(row: &Row) -> BTreeMap<String, String> {
    row.iter()
        .map(|(field, value)| (field.clone(), value.value.clone()))
        .collect()
}

/// Human-readable form of a relation value.
fn relation_label(value: &TypedValue) -> String {
    match value.kind {
        TermKind::Uri => extract_id(value),
        _ => value.value.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{result_set, triples};

    #[test]
    fn test_directional_example() {
        let rs = triples(&[("http://x/A", "http://x/rel", "foo")]);
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();

        assert_eq!(graph.node_count(), 2);
        let a = graph.node("A").unwrap();
        assert_eq!(a.uri.as_deref(), Some("http://x/A"));
        assert_eq!(a.kind, TermKind::Uri);
        let foo = graph.node("foo").unwrap();
        assert_eq!(foo.label, "foo");
        assert_eq!(foo.uri, None);

        assert_eq!(graph.link_count(), 1);
        let link = &graph.links()[0];
        assert_eq!((link.source.as_str(), link.target.as_str()), ("A", "foo"));
        assert_eq!(link.kind, LinkKind::Directional);
        assert_eq!(a.degree, 1);
    }

    #[test]
    fn test_node_attributes_from_first_row() {
        let rs = triples(&[
            ("http://x/A", "http://x/rel", "one"),
            ("http://x/A", "http://x/rel", "two"),
        ]);
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();
        let a = graph.node("A").unwrap();
        assert_eq!(a.attributes["o"], "one");
        assert_eq!(a.attributes["p"], "http://x/rel");
        assert_eq!(a.degree, 2);
    }

    #[test]
    fn test_duplicate_rows_dedupe_links() {
        let rs = triples(&[
            ("http://x/A", "http://x/rel", "http://x/B"),
            ("http://x/A", "http://x/rel", "http://x/B"),
        ]);
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_semantic_links_labelled_by_relation() {
        let rs = triples(&[
            ("http://x/A", "http://x/knows", "http://x/B"),
            ("http://x/A", "http://x/likes", "http://x/B"),
        ]);
        let mapping = FieldMapping::semantic("s", Some("o".into()), "p");
        let graph = transform(&rs, &mapping).unwrap();

        // Keyed by (source, target, semantic): first relation wins
        assert_eq!(graph.link_count(), 1);
        let link = &graph.links()[0];
        assert_eq!(link.kind, LinkKind::Semantic);
        assert_eq!(link.label.as_deref(), Some("knows"));
    }

    #[test]
    fn test_cooccurrence_mode() {
        let rs = triples(&[
            ("http://x/A", "http://x/red", "1"),
            ("http://x/B", "http://x/red", "2"),
            ("http://x/B", "http://x/round", "3"),
            ("http://x/A", "http://x/round", "4"),
            ("http://x/C", "http://x/blue", "5"),
        ]);
        let mapping = FieldMapping::semantic("s", None, "p");
        let graph = transform(&rs, &mapping).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.link_count(), 1);
        let link = &graph.links()[0];
        assert_eq!(link.kind, LinkKind::Cooccurrence);
        assert_eq!(link.shared_values.len(), 2);
        assert_eq!(graph.node("C").unwrap().degree, 0);
        assert_eq!(graph.node("A").unwrap().degree, 1);
    }

    #[test]
    fn test_rows_missing_source_skipped() {
        let rs = result_set(
            &["s", "o"],
            vec![
                vec![("o", TypedValue::literal("orphan"))],
                vec![
                    ("s", TypedValue::uri("http://x/A")),
                    ("o", TypedValue::literal("x")),
                ],
            ],
        );
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(!graph.contains_node("orphan"));
    }

    #[test]
    fn test_missing_target_creates_no_link() {
        let rs = result_set(
            &["s", "o"],
            vec![vec![("s", TypedValue::uri("http://x/A"))]],
        );
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_label_from_sibling_column() {
        let rs = result_set(
            &["item", "itemLabel", "other"],
            vec![vec![
                ("item", TypedValue::uri("http://www.wikidata.org/entity/Q42")),
                ("itemLabel", TypedValue::literal("Douglas Adams").with_lang("en")),
                ("other", TypedValue::literal("x")),
            ]],
        );
        let graph = transform(&rs, &FieldMapping::directional("item", "other")).unwrap();
        assert_eq!(graph.node("Q42").unwrap().label, "Douglas Adams");
    }

    #[test]
    fn test_empty_result_set() {
        let rs = result_set(&["s", "o"], vec![]);
        let graph = transform(&rs, &FieldMapping::directional("s", "o")).unwrap();
        assert!(graph.is_empty());
    }
}

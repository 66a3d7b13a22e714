//! Co-occurrence link inference.
//!
//! When a semantic relation field is given but no target field, entities
//! are linked when they share a value of the relation field. Rows are
//! collected first; links are only built once every row has been seen.

use crate::{GraphData, Link, LinkKind, SharedValue};
use sparqvis_core::{Result, Row, extract_id};
use std::collections::HashMap;

/// Accumulates `(source id, relation value)` observations.
#[derive(Debug, Default)]
pub struct CooccurrenceCollector {
    relation_field: String,
    /// Relation values (display form) in first-seen order, with member ids.
    groups: Vec<(String, Vec<String>)>,
    /// Raw relation value to position in `groups`.
    group_index: HashMap<String, usize>,
}

impl CooccurrenceCollector {
    /// Collector grouping by `relation_field`.
    pub fn new(relation_field: impl Into<String>) -> Self {
        Self {
            relation_field: relation_field.into(),
            ..Default::default()
        }
    }

    /// Record the relation value of one row for `source_id`.
    ///
    /// Rows without a relation value are ignored.
    pub fn observe(&mut self, source_id: &str, row: &Row) {
        let Some(value) = row.get(&self.relation_field) else {
            return;
        };
        if value.value.is_empty() {
            return;
        }

        let idx = match self.group_index.get(&value.value) {
            Some(&idx) => idx,
            None => {
                self.groups.push((extract_id(value), Vec::new()));
                self.group_index
                    .insert(value.value.clone(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        let members = &mut self.groups[idx].1;
        if !members.iter().any(|m| m == source_id) {
            members.push(source_id.to_string());
        }
    }

    /// Build merged co-occurrence links.
    ///
    /// Every group of two or more ids yields a link for each unordered pair.
    /// Links on the same pair are merged: their values are folded into
    /// `shared_values`, `weight` counts the folded values and `group_size`
    /// keeps the largest group the pair appeared in.
    pub fn build_links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = Vec::new();
        let mut by_pair: HashMap<(String, String), usize> = HashMap::new();

        for (value, members) in &self.groups {
            if members.len() < 2 {
                continue;
            }
            let shared = SharedValue {
                value: value.clone(),
                relation_kind: self.relation_field.clone(),
            };

            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    let pair = if a <= b {
                        (a.clone(), b.clone())
                    } else {
                        (b.clone(), a.clone())
                    };

                    match by_pair.get(&pair) {
                        Some(&idx) => {
                            // groups are keyed by raw value, so each visit is a new value
                            let link = &mut links[idx];
                            link.shared_values.push(shared.clone());
                            link.weight = Some(link.weight.unwrap_or(0) + 1);
                            link.group_size = link.group_size.max(Some(members.len()));
                        }
                        None => {
                            let mut link = Link::new(a, b, LinkKind::Cooccurrence);
                            link.shared_values.push(shared.clone());
                            link.weight = Some(1);
                            link.group_size = Some(members.len());
                            by_pair.insert(pair, links.len());
                            links.push(link);
                        }
                    }
                }
            }
        }

        links
    }

    /// Add the merged links to `graph`.
    pub fn apply(&self, graph: &mut GraphData) -> Result<usize> {
        let mut added = 0;
        for link in self.build_links() {
            if graph.add_link(link)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Number of distinct relation values seen.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparqvis_core::TypedValue;

    fn row(value: &str) -> Row {
        let mut row = Row::new();
        row.insert("p".into(), TypedValue::uri(format!("http://x/{value}")));
        row
    }

    #[test]
    fn test_pairs_within_group() {
        let mut collector = CooccurrenceCollector::new("p");
        collector.observe("a", &row("red"));
        collector.observe("b", &row("red"));
        collector.observe("c", &row("red"));
        collector.observe("d", &row("blue"));

        let links = collector.build_links();
        assert_eq!(links.len(), 3);
        assert!(links.iter().all(|l| l.kind == LinkKind::Cooccurrence));
        assert!(links.iter().all(|l| l.group_size == Some(3)));
        assert!(!links.iter().any(|l| l.touches("d")));
    }

    #[test]
    fn test_two_shared_values_merge_into_one_link() {
        let mut collector = CooccurrenceCollector::new("p");
        collector.observe("a", &row("red"));
        collector.observe("b", &row("red"));
        collector.observe("b", &row("round"));
        collector.observe("a", &row("round"));

        let links = collector.build_links();
        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.shared_values.len(), 2);
        assert_eq!(link.weight, Some(2));
        assert_eq!(link.shared_values[0].value, "red");
        assert_eq!(link.shared_values[1].relation_kind, "p");
    }

    #[test]
    fn test_values_with_same_local_name_fold_separately() {
        let uri_row = |iri: &str| {
            let mut row = Row::new();
            row.insert("p".into(), TypedValue::uri(iri));
            row
        };
        let mut collector = CooccurrenceCollector::new("p");
        for id in ["a", "b"] {
            collector.observe(id, &uri_row("http://one.org/red"));
            collector.observe(id, &uri_row("http://two.org/red"));
        }

        let links = collector.build_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].shared_values.len(), 2);
        assert_eq!(links[0].weight, Some(2));
        assert!(links[0].shared_values.iter().all(|v| v.value == "red"));
    }

    #[test]
    fn test_never_duplicated_in_both_directions() {
        let mut collector = CooccurrenceCollector::new("p");
        collector.observe("a", &row("x"));
        collector.observe("b", &row("x"));
        collector.observe("b", &row("y"));
        collector.observe("a", &row("y"));

        let links = collector.build_links();
        let forward = links.iter().filter(|l| l.source == "a" && l.target == "b").count();
        let backward = links.iter().filter(|l| l.source == "b" && l.target == "a").count();
        assert_eq!(forward + backward, 1);
    }

    #[test]
    fn test_repeated_rows_do_not_inflate_groups() {
        let mut collector = CooccurrenceCollector::new("p");
        collector.observe("a", &row("x"));
        collector.observe("a", &row("x"));
        assert!(collector.build_links().is_empty());
        assert_eq!(collector.group_count(), 1);
    }

    #[test]
    fn test_rows_without_relation_ignored() {
        let mut collector = CooccurrenceCollector::new("p");
        collector.observe("a", &Row::new());
        assert_eq!(collector.group_count(), 0);
    }
}

//! Graph statistics.
//!
//! Composition and degree figures for a transformed graph, used for
//! logging after each cycle and for picking out hub entities.

use crate::GraphData;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Types
// ============================================================================

/// Statistics about a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of links.
    pub link_count: usize,
    /// Links per link kind.
    pub link_kind_distribution: BTreeMap<String, usize>,
    /// Nodes per term kind.
    pub node_kind_distribution: BTreeMap<String, usize>,
    /// Nodes without any links.
    pub orphan_count: usize,
    /// Average links per node.
    pub avg_degree: f32,
    /// Highest node degree.
    pub max_degree: usize,
    /// Node with the highest degree, earliest inserted on ties.
    pub most_connected: Option<String>,
}

/// Direction for degree calculation.
#[derive(Clone, Copy, Debug)]
pub enum DegreeDirection {
    /// Incoming links only.
    In,
    /// Outgoing links only.
    Out,
    /// Both directions.
    Both,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
///
/// Relies on the degrees stored on the nodes, so call it on a graph whose
/// degrees are current (as returned by the transformation).
pub fn compute_stats(graph: &GraphData) -> GraphStats {
    let node_count = graph.node_count();
    let link_count = graph.link_count();

    let mut link_kind_distribution = BTreeMap::new();
    for link in graph.iter_links() {
        *link_kind_distribution
            .entry(link.kind.name().to_string())
            .or_insert(0) += 1;
    }

    let mut node_kind_distribution = BTreeMap::new();
    for node in graph.iter_nodes() {
        *node_kind_distribution
            .entry(node.kind.as_str().to_string())
            .or_insert(0) += 1;
    }

    let orphan_count = graph.iter_nodes().filter(|n| n.degree == 0).count();
    let total_degree: usize = graph.iter_nodes().map(|n| n.degree).sum();
    let avg_degree = if node_count > 0 {
        total_degree as f32 / node_count as f32
    } else {
        0.0
    };

    let mut most_connected: Option<(&str, usize)> = None;
    for node in graph.iter_nodes() {
        if most_connected.is_none_or(|(_, best)| node.degree > best) {
            most_connected = Some((&node.id, node.degree));
        }
    }

    GraphStats {
        node_count,
        link_count,
        link_kind_distribution,
        node_kind_distribution,
        orphan_count,
        avg_degree,
        max_degree: most_connected.map_or(0, |(_, d)| d),
        most_connected: most_connected.map(|(id, _)| id.to_string()),
    }
}

/// Get a quick summary of graph size.
pub fn quick_summary(graph: &GraphData) -> String {
    format!("{} nodes, {} links", graph.node_count(), graph.link_count())
}

/// Get the top `limit` nodes by degree, highest first.
///
/// Ties keep insertion order.
pub fn top_nodes_by_degree(
    graph: &GraphData,
    limit: usize,
    direction: DegreeDirection,
) -> Vec<(String, usize)> {
    let mut scores: Vec<(String, usize)> = graph
        .iter_nodes()
        .filter_map(|node| {
            let idx = graph.get_index(&node.id)?;
            let incoming = || graph.graph.edges_directed(idx, Direction::Incoming).count();
            let outgoing = || graph.graph.edges_directed(idx, Direction::Outgoing).count();
            let degree = match direction {
                DegreeDirection::In => incoming(),
                DegreeDirection::Out => outgoing(),
                DegreeDirection::Both => node.degree,
            };
            Some((node.id.clone(), degree))
        })
        .collect();

    scores.sort_by(|a, b| b.1.cmp(&a.1));
    scores.truncate(limit);
    scores
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn create_test_graph() -> GraphData {
        let mut graph = GraphData::new();
        graph.add_node(Node::new("a", "A").with_uri("http://x/a"));
        graph.add_node(Node::new("b", "B").with_uri("http://x/b"));
        graph.add_node(Node::new("c", "C"));
        graph.add_node(Node::new("orphan", "Orphan"));

        graph
            .add_link(Link::new("a", "b", LinkKind::Directional))
            .unwrap();
        graph
            .add_link(Link::new("a", "c", LinkKind::Directional))
            .unwrap();
        graph
            .add_link(Link::new("b", "c", LinkKind::Cooccurrence))
            .unwrap();
        graph.recompute_degrees();
        graph
    }

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.link_count, 3);
        assert_eq!(stats.orphan_count, 1);
        assert_eq!(stats.link_kind_distribution["directional"], 2);
        assert_eq!(stats.link_kind_distribution["cooccurrence"], 1);
        assert_eq!(stats.node_kind_distribution["uri"], 2);
        assert_eq!(stats.node_kind_distribution["literal"], 2);
        assert!((stats.avg_degree - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_most_connected_earliest_on_tie() {
        let stats = compute_stats(&create_test_graph());
        // a, b and c all have degree 2
        assert_eq!(stats.max_degree, 2);
        assert_eq!(stats.most_connected.as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_graph_stats() {
        let stats = compute_stats(&GraphData::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.avg_degree, 0.0);
        assert_eq!(stats.max_degree, 0);
        assert!(stats.most_connected.is_none());
    }

    #[test]
    fn test_quick_summary() {
        assert_eq!(quick_summary(&create_test_graph()), "4 nodes, 3 links");
    }

    #[test]
    fn test_top_nodes_by_degree() {
        let graph = create_test_graph();

        let out = top_nodes_by_degree(&graph, 1, DegreeDirection::Out);
        assert_eq!(out, vec![("a".to_string(), 2)]);

        let incoming = top_nodes_by_degree(&graph, 1, DegreeDirection::In);
        assert_eq!(incoming, vec![("c".to_string(), 2)]);

        let both = top_nodes_by_degree(&graph, 10, DegreeDirection::Both);
        assert_eq!(both.len(), 4);
        assert_eq!(both.last().unwrap(), &("orphan".to_string(), 0));
    }
}

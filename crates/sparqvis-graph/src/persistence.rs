//! Graph snapshots.
//!
//! A transformed graph can be written to JSON together with the signature
//! of the data it was built from, and reloaded later without re-running the
//! transformation. The petgraph mirror is rebuilt on load.

use crate::{GraphData, Link, Node};
use serde::{Deserialize, Serialize};
use sparqvis_core::{Error, Result};
use std::path::Path;

// ============================================================================
// Serializable types
// ============================================================================

/// Serializable representation of graph data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializableGraph {
    /// Nodes in insertion order.
    pub nodes: Vec<Node>,
    /// Links in insertion order.
    pub links: Vec<Link>,
    /// Optional metadata about the snapshot.
    #[serde(default)]
    pub metadata: Option<GraphMetadata>,
}

/// Metadata about a persisted graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// When the graph was built (unix timestamp).
    pub built_at: String,
    /// Version of the builder.
    pub builder_version: String,
    /// Signature of the result set and encoding the graph was built from.
    #[serde(default)]
    pub data_signature: Option<String>,
}

impl GraphMetadata {
    /// Metadata stamped with `signature`.
    pub fn with_signature(signature: impl Into<String>) -> Self {
        Self {
            data_signature: Some(signature.into()),
            ..Default::default()
        }
    }
}

impl Default for GraphMetadata {
    fn default() -> Self {
        Self {
            built_at: timestamp_now(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            data_signature: None,
        }
    }
}

fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a graph to a JSON file.
pub fn save_graph(
    graph: &GraphData,
    path: impl AsRef<Path>,
    metadata: Option<GraphMetadata>,
) -> Result<()> {
    let serializable = SerializableGraph {
        nodes: graph.nodes().to_vec(),
        links: graph.links().to_vec(),
        metadata,
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| Error::serialization(format!("failed to serialize graph: {e}")))?;

    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    log::debug!(
        "saved graph ({} nodes, {} links) to {}",
        graph.node_count(),
        graph.link_count(),
        path.as_ref().display()
    );
    Ok(())
}

/// Load a graph from a JSON file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<GraphData> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;

    load_graph_from_str(&json)
}

/// Load a graph from a JSON string.
///
/// Links whose endpoints are missing are dropped. Stored degrees are
/// discarded and recomputed from the surviving links.
pub fn load_graph_from_str(json: &str) -> Result<GraphData> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("failed to parse graph JSON: {e}")))?;

    to_graph_data(serializable)
}

fn to_graph_data(serializable: SerializableGraph) -> Result<GraphData> {
    let mut graph = GraphData::new();

    for node in serializable.nodes {
        graph.add_node(node);
    }

    let mut dropped = 0usize;
    for link in serializable.links {
        if !graph.contains_node(&link.source) || !graph.contains_node(&link.target) {
            dropped += 1;
            continue;
        }
        graph.add_link(link)?;
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} link(s) referencing missing nodes");
    }

    graph.recompute_degrees();
    Ok(graph)
}

/// Check if a snapshot was built from data with `signature`.
///
/// Returns `false` when the file is missing, unreadable or unsigned.
pub fn is_cache_fresh(cache_path: impl AsRef<Path>, signature: &str) -> bool {
    let Ok(json) = std::fs::read_to_string(cache_path.as_ref()) else {
        return false;
    };
    serde_json::from_str::<SerializableGraph>(&json)
        .ok()
        .and_then(|sg| sg.metadata)
        .and_then(|m| m.data_signature)
        .is_some_and(|cached| cached == signature)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkKind;
    use sparqvis_core::TermKind;
    use tempfile::tempdir;

    fn create_test_graph() -> GraphData {
        let mut graph = GraphData::new();
        graph.add_node(Node::new("a", "Node A").with_uri("http://x/a"));
        graph.add_node(Node::new("b", "Node B").with_attribute("p", "v"));
        graph
            .add_link(Link::new("a", "b", LinkKind::Semantic).with_label("knows"))
            .unwrap();
        graph.recompute_degrees();
        graph
    }

    #[test]
    fn test_save_and_load_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let original = create_test_graph();
        save_graph(&original, &path, None).unwrap();
        let loaded = load_graph(&path).unwrap();

        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.link_count(), 1);
        assert_eq!(loaded.node("a").unwrap().kind, TermKind::Uri);
        assert_eq!(loaded.node("b").unwrap().attributes["p"], "v");
        assert_eq!(loaded.links()[0].label.as_deref(), Some("knows"));
        assert_eq!(loaded.node("a").unwrap().degree, 1);
    }

    #[test]
    fn test_load_rebuilds_structure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&create_test_graph(), &path, None).unwrap();

        let loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.neighbors("a"), vec!["b"]);
    }

    #[test]
    fn test_links_with_missing_nodes_dropped() {
        let json = r#"{
            "nodes": [
                {"id": "a", "label": "A", "uri": null, "kind": "literal"}
            ],
            "links": [
                {"source": "a", "target": "missing", "kind": "directional"}
            ]
        }"#;

        let graph = load_graph_from_str(json).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.node("a").unwrap().degree, 0);
    }

    #[test]
    fn test_is_cache_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let metadata = GraphMetadata::with_signature("sig123");
        save_graph(&create_test_graph(), &path, Some(metadata)).unwrap();

        assert!(is_cache_fresh(&path, "sig123"));
        assert!(!is_cache_fresh(&path, "other"));
        assert!(!is_cache_fresh(dir.path().join("missing.json"), "sig123"));
    }

    #[test]
    fn test_unsigned_cache_is_stale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        save_graph(&create_test_graph(), &path, Some(GraphMetadata::default())).unwrap();
        assert!(!is_cache_fresh(&path, "sig123"));
    }

    #[test]
    fn test_load_graph_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        std::fs::write(&path, "not valid json").unwrap();
        assert!(load_graph(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = load_graph("/nonexistent/graph.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/graph.json"));
    }

    #[test]
    fn test_metadata_default() {
        let meta = GraphMetadata::default();
        assert!(!meta.built_at.is_empty());
        assert!(!meta.builder_version.is_empty());
        assert!(meta.data_signature.is_none());
    }
}

//! Graph model types.
//!
//! [`GraphData`] owns the nodes and links of one transformation cycle.
//! Nodes are inserted first-write-wins; links are deduplicated by a kind
//! specific key. The petgraph `DiGraph` mirrors the collections so degree
//! and neighbourhood queries stay cheap.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use sparqvis_core::{Error, Result, TermKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

// ============================================================================
// Nodes
// ============================================================================

/// An entity drawn as a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Full IRI when the entity is an IRI.
    pub uri: Option<String>,
    /// Term kind of the entity.
    pub kind: TermKind,
    /// Row values seen when the node was first created.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Number of links touching this node.
    #[serde(default)]
    pub degree: usize,
}

impl Node {
    /// Create a literal-kind node labelled with its id.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            uri: None,
            kind: TermKind::Literal,
            attributes: BTreeMap::new(),
            degree: 0,
        }
    }

    /// Mark the node as an IRI entity.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self.kind = TermKind::Uri;
        self
    }

    /// Set the term kind.
    pub fn with_kind(mut self, kind: TermKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }
}

// ============================================================================
// Links
// ============================================================================

/// How a link was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Stated by the data: source field to target field.
    Directional,
    /// Stated by the data and labelled by a relation field.
    Semantic,
    /// Inferred from a shared relation value.
    Cooccurrence,
}

impl LinkKind {
    /// Wire name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Directional => "directional",
            Self::Semantic => "semantic",
            Self::Cooccurrence => "cooccurrence",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A relation value two co-occurring entities have in common.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedValue {
    /// Shared value, in display form.
    pub value: String,
    /// Field the value was read from.
    pub relation_kind: String,
}

/// A link between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Derivation.
    pub kind: LinkKind,
    /// Human-readable relation (semantic links).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Row values that produced the link.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Values shared by the endpoints (co-occurrence links).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_values: Vec<SharedValue>,
    /// Number of shared-value occurrences folded into this link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<usize>,
    /// Largest co-occurrence group the pair was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_size: Option<usize>,
}

impl Link {
    /// Create a link with no attributes.
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            label: None,
            attributes: BTreeMap::new(),
            shared_values: Vec::new(),
            weight: None,
            group_size: None,
        }
    }

    /// Set the relation label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the attributes.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether the link touches `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Deduplication key.
    ///
    /// Co-occurrence links are undirected, so their key orders the endpoints.
    pub fn key(&self) -> LinkKey {
        match self.kind {
            LinkKind::Cooccurrence => {
                let (a, b) = if self.source <= self.target {
                    (&self.source, &self.target)
                } else {
                    (&self.target, &self.source)
                };
                LinkKey::new(a, b, self.kind)
            }
            _ => LinkKey::new(&self.source, &self.target, self.kind),
        }
    }
}

/// Identity of a link for deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
    from: String,
    to: String,
    kind: LinkKind,
}

impl LinkKey {
    fn new(from: &str, to: &str, kind: LinkKind) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        }
    }
}

// ============================================================================
// GraphData
// ============================================================================

/// Nodes and links produced by one transformation.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    /// Structure mirror: node weights are ids, edge weights index `links`.
    pub(crate) graph: DiGraph<String, usize>,
    /// Node id to graph index.
    pub(crate) node_indices: HashMap<String, NodeIndex>,
    /// Nodes in insertion order.
    pub(crate) nodes: Vec<Node>,
    /// Links in insertion order.
    pub(crate) links: Vec<Link>,
    /// Keys of inserted links.
    pub(crate) link_keys: HashSet<LinkKey>,
}

impl GraphData {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same id exists.
    ///
    /// Returns `true` when the node was inserted.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node_indices.contains_key(&node.id) {
            return false;
        }
        let idx = self.graph.add_node(node.id.clone());
        self.node_indices.insert(node.id.clone(), idx);
        self.nodes.push(node);
        true
    }

    /// Insert a link unless an equivalent one exists.
    ///
    /// Both endpoints must already be present. Returns `true` when the link
    /// was inserted.
    pub fn add_link(&mut self, link: Link) -> Result<bool> {
        let from = self.get_index(&link.source).ok_or_else(|| {
            Error::invalid_data(format!("link source '{}' is not a node", link.source))
        })?;
        let to = self.get_index(&link.target).ok_or_else(|| {
            Error::invalid_data(format!("link target '{}' is not a node", link.target))
        })?;

        if !self.link_keys.insert(link.key()) {
            return Ok(false);
        }
        self.graph.add_edge(from, to, self.links.len());
        self.links.push(link);
        Ok(true)
    }

    /// Recompute every node's degree from the current link set.
    ///
    /// A self-loop counts once.
    pub fn recompute_degrees(&mut self) {
        for node in &mut self.nodes {
            let Some(&idx) = self.node_indices.get(&node.id) else {
                continue;
            };
            let outgoing = self.graph.edges_directed(idx, Direction::Outgoing).count();
            let incoming = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| e.source() != idx)
                .count();
            node.degree = outgoing + incoming;
        }
    }

    /// Graph index of a node.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Whether a node with `id` exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&Node> {
        let idx = self.get_index(id)?;
        self.nodes.get(idx.index())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Links in insertion order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Iterate nodes.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate links.
    pub fn iter_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Ids of nodes linked to `id` in either direction.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.get_index(id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.graph
            .neighbors_undirected(idx)
            .filter(|n| seen.insert(*n))
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the graph into its node and link collections.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Link>) {
        (self.nodes, self.links)
    }
}

// ============================================================================
// Tests
// ============================================================================

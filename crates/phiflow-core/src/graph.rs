//! Graph wrapper using petgraph::StableDiGraph with string node identifiers

use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// The flow graph: directed, at most one edge per ordered node pair.
///
/// Nodes are created implicitly by [`FlowGraph::add_edge`]; adding an edge
/// between a pair that already has one replaces its attributes.
#[derive(Clone)]
pub struct FlowGraph {
    inner: StableDiGraph<FlowNode, FlowEdge>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for FlowGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl FlowGraph {
    pub fn new() -> Self {
        FlowGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node if it does not exist yet. Returns its index either way.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.inner.add_node(FlowNode {
            name: name.to_string(),
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Insert or replace the edge `from -> to`, creating missing endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, edge: FlowEdge) {
        let source = self.add_node(from);
        let target = self.add_node(to);
        self.inner.update_edge(source, target, edge);
    }

    /// Builder form of [`FlowGraph::add_edge`].
    pub fn with_edge(mut self, from: &str, to: &str, cost: f64, coherence: f64) -> Self {
        self.add_edge(from, to, FlowEdge::new(cost, coherence));
        self
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a node's index by name.
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Name of the node at `idx`.
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.inner.node_weight(idx).map(|n| n.name.as_str())
    }

    /// Get the edge `from -> to`.
    pub fn edge(&self, from: &str, to: &str) -> Option<&FlowEdge> {
        let source = self.node_index(from)?;
        let target = self.node_index(to)?;
        self.inner
            .find_edge(source, target)
            .and_then(|e| self.inner.edge_weight(e))
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all node names.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
            .map(|n| n.name.as_str())
    }

    /// Iterate over all edges as `(from, to, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &FlowEdge)> {
        self.inner.edge_indices().filter_map(move |e| {
            let (source, target) = self.inner.edge_endpoints(e)?;
            Some((self.name(source)?, self.name(target)?, self.inner.edge_weight(e)?))
        })
    }

    /// Outgoing edges of a node, by name. Empty for unknown nodes.
    pub fn edges_from<'a>(&'a self, from: &str) -> impl Iterator<Item = (&'a str, &'a FlowEdge)> + 'a {
        self.node_index(from)
            .into_iter()
            .flat_map(move |idx| self.outgoing(idx))
            .filter_map(move |(target, edge)| Some((self.name(target)?, edge)))
    }

    /// Outgoing edges of a node as `(target index, edge)`.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &FlowEdge)> {
        self.inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge_ref| (edge_ref.target(), edge_ref.weight()))
    }
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

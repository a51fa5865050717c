//! Core data structures for the flow graph

use serde::{Deserialize, Serialize};

/// Edge cost used by graph files that leave `cost` out.
pub const DEFAULT_EDGE_COST: f64 = 1.0;

/// Edge coherence used by graph files that give neither `coherence` nor `energy`.
pub const DEFAULT_EDGE_COHERENCE: f64 = 0.5;

/// A node in the flow graph, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowNode {
    pub name: String,
}

/// A directed edge's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Traditional traversal cost. Expected non-negative; not validated.
    pub cost: f64,
    /// Caller-supplied alignment score, conventionally in `[0, 1]`.
    pub coherence: f64,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowEdge {
    pub fn new(cost: f64, coherence: f64) -> Self {
        FlowEdge {
            cost,
            coherence,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The edge's contribution to the combined cost under the given weights.
    pub fn weighted(&self, cost_weight: f64, coherence_weight: f64) -> f64 {
        cost_weight * self.cost - coherence_weight * self.coherence
    }
}

/// One traversed edge of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub from: String,
    pub to: String,
    pub cost: f64,
    pub coherence: f64,
}

/// A path found by the pathfinder, with its summary totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Node names from start to end inclusive.
    pub nodes: Vec<String>,
    /// The edges between consecutive nodes.
    pub hops: Vec<Hop>,
    /// The minimized objective: best combined cost recorded for the end node.
    pub combined_cost: f64,
    /// Sum of raw hop costs.
    pub total_cost: f64,
    /// Sum of hop coherence scores.
    pub total_coherence: f64,
}

impl Route {
    /// The trivial route of a node to itself.
    pub fn single(node: impl Into<String>) -> Self {
        Route {
            nodes: vec![node.into()],
            hops: Vec::new(),
            combined_cost: 0.0,
            total_cost: 0.0,
            total_coherence: 0.0,
        }
    }

    /// Build a route from its hops. `start` is only used when `hops` is empty.
    pub fn from_hops(start: impl Into<String>, hops: Vec<Hop>, combined_cost: f64) -> Self {
        let mut nodes = vec![
            hops.first()
                .map(|h| h.from.clone())
                .unwrap_or_else(|| start.into()),
        ];
        nodes.extend(hops.iter().map(|h| h.to.clone()));

        Route {
            nodes,
            total_cost: hops.iter().map(|h| h.cost).sum(),
            total_coherence: hops.iter().map(|h| h.coherence).sum(),
            hops,
            combined_cost,
        }
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// True for the single-node route of a node to itself.
    pub fn is_trivial(&self) -> bool {
        self.hops.is_empty()
    }

    /// Nodes joined with `" -> "`.
    pub fn display_path(&self) -> String {
        self.nodes.join(" -> ")
    }
}

//! Graph description files
//!
//! A graph file maps each node to its outgoing edges:
//!
//! ```json
//! {
//!   "A": { "B": { "cost": 10, "coherence": 0.7 } },
//!   "B": {}
//! }
//! ```
//!
//! or in TOML, one table per edge:
//!
//! ```toml
//! [A.B]
//! cost = 10
//! energy = { initial_magnitude = 10.0, final_magnitude = 16.18, efficiency = 0.9, entropy_change = 0.1 }
//!
//! [B]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use phiflow_score::{EnergyTransfer, ScoreWeights, energy_coherence_score};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::graph::FlowGraph;
use crate::model::{DEFAULT_EDGE_COHERENCE, DEFAULT_EDGE_COST, FlowEdge};

/// One edge as written in a graph file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub cost: Option<f64>,
    #[serde(alias = "phi_harmony_value")]
    pub coherence: Option<f64>,
    /// Derive the coherence from an energy transfer instead.
    pub energy: Option<EnergyTransfer>,
    pub label: Option<String>,
}

/// Node name to neighbor name to edge.
pub type GraphSpec = BTreeMap<String, BTreeMap<String, EdgeSpec>>;

impl EdgeSpec {
    /// Resolve defaults and scoring into a concrete edge.
    pub fn resolve(&self, from: &str, to: &str, weights: &ScoreWeights) -> Result<FlowEdge, LoadError> {
        let coherence = match (self.coherence, &self.energy) {
            (Some(_), Some(_)) => {
                return Err(LoadError::AmbiguousCoherence {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            (Some(coherence), None) => coherence,
            (None, Some(transfer)) => energy_coherence_score(transfer, weights),
            (None, None) => {
                tracing::debug!(
                    "Edge {} -> {} has no coherence, using default {}",
                    from,
                    to,
                    DEFAULT_EDGE_COHERENCE
                );
                DEFAULT_EDGE_COHERENCE
            }
        };

        Ok(FlowEdge {
            cost: self.cost.unwrap_or(DEFAULT_EDGE_COST),
            coherence,
            label: self.label.clone(),
        })
    }
}

/// Build a graph from a parsed description. Nodes and edges are inserted in
/// key order.
pub fn build_graph(spec: &GraphSpec, weights: &ScoreWeights) -> Result<FlowGraph, LoadError> {
    weights.validate()?;

    let mut graph = FlowGraph::new();
    for (from, neighbors) in spec {
        graph.add_node(from);
        for (to, edge) in neighbors {
            graph.add_edge(from, to, edge.resolve(from, to, weights)?);
        }
    }
    Ok(graph)
}

pub fn parse_graph_json(text: &str, weights: &ScoreWeights) -> Result<FlowGraph, LoadError> {
    let spec: GraphSpec = serde_json::from_str(text)?;
    build_graph(&spec, weights)
}

pub fn parse_graph_toml(text: &str, weights: &ScoreWeights) -> Result<FlowGraph, LoadError> {
    let spec: GraphSpec = toml::from_str(text)?;
    build_graph(&spec, weights)
}

/// Load a `.json` or `.toml` graph file.
pub fn load_graph(path: &Path, weights: &ScoreWeights) -> Result<FlowGraph, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str, &ScoreWeights) -> Result<FlowGraph, LoadError> = match extension.as_deref() {
        Some("json") => parse_graph_json,
        Some("toml") => parse_graph_toml,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse(&text, weights)?;

    tracing::info!(
        "Loaded {} nodes, {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

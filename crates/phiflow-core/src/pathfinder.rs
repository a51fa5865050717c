//! Coherence-biased shortest path search
//!
//! A Dijkstra-style search whose edge weight is
//! `cost_weight * cost - coherence_weight * coherence`. High-coherence edges
//! get cheaper, and can get negative. Nothing here detects negative cycles
//! exactly: the relaxation cap in [`SearchConfig`] bounds the work and
//! reports [`PathfinderError::NegativeCycleSuspected`] when it is hit, and
//! `weight_floor` can keep increments non-negative.
//!
//! Under negative increments the first time `end` is popped it is returned,
//! even if a cheaper route would have been found later.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;

use crate::config::SearchConfig;
use crate::error::{PathfinderError, PathfinderResult};
use crate::graph::FlowGraph;
use crate::model::{Hop, Route};

/// Priority queue entry. Ordered so that `BinaryHeap` pops the lowest
/// combined cost first, then the lowest node name, then the oldest push.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry<'g> {
    cost: f64,
    name: &'g str,
    node: NodeIndex,
    seq: u64,
}

impl Ord for FrontierEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: reversed on every key
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.name.cmp(self.name))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry<'_> {}

/// How a node was last reached.
#[derive(Debug, Clone, Copy)]
struct Predecessor {
    node: NodeIndex,
    cost: f64,
    coherence: f64,
}

/// State owned by one search call.
struct Search<'g> {
    graph: &'g FlowGraph,
    config: &'g SearchConfig,
    best_cost: HashMap<NodeIndex, f64>,
    predecessor: HashMap<NodeIndex, Predecessor>,
    frontier: BinaryHeap<FrontierEntry<'g>>,
    seq: u64,
    relaxations: usize,
    cap: usize,
}

impl<'g> Search<'g> {
    fn new(graph: &'g FlowGraph, config: &'g SearchConfig) -> Self {
        Search {
            graph,
            config,
            best_cost: HashMap::new(),
            predecessor: HashMap::new(),
            frontier: BinaryHeap::new(),
            seq: 0,
            relaxations: 0,
            cap: config.relaxation_cap(graph.node_count(), graph.edge_count()),
        }
    }

    fn best(&self, node: NodeIndex) -> f64 {
        self.best_cost.get(&node).copied().unwrap_or(f64::INFINITY)
    }

    fn push(&mut self, cost: f64, node: NodeIndex) {
        let name = self.graph.name(node).unwrap_or_default();
        self.frontier.push(FrontierEntry {
            cost,
            name,
            node,
            seq: self.seq,
        });
        self.seq += 1;
    }

    fn run(mut self, start: NodeIndex, end: NodeIndex) -> PathfinderResult<Option<Route>> {
        self.best_cost.insert(start, 0.0);
        self.push(0.0, start);

        while let Some(entry) = self.frontier.pop() {
            if entry.node == end {
                return self.reconstruct(start, end, entry.cost).map(Some);
            }

            let current_best = self.best(entry.node);
            if entry.cost > current_best {
                continue;
            }

            let graph = self.graph;
            for (neighbor, edge) in graph.outgoing(entry.node) {
                let combined = current_best + self.config.edge_weight(edge);
                if combined < self.best(neighbor) {
                    self.relaxations += 1;
                    if self.relaxations > self.cap {
                        tracing::warn!(
                            "Relaxation cap of {} exceeded from {}, negative cycle suspected",
                            self.cap,
                            graph.name(start).unwrap_or_default()
                        );
                        return Err(PathfinderError::NegativeCycleSuspected {
                            relaxations: self.relaxations,
                        });
                    }

                    self.best_cost.insert(neighbor, combined);
                    self.predecessor.insert(
                        neighbor,
                        Predecessor {
                            node: entry.node,
                            cost: edge.cost,
                            coherence: edge.coherence,
                        },
                    );
                    self.push(combined, neighbor);

                    tracing::debug!(
                        "Exploring: {} -> {} (cost: {}, coherence: {:.2}, combined: {:.2})",
                        entry.name,
                        graph.name(neighbor).unwrap_or_default(),
                        edge.cost,
                        edge.coherence,
                        combined
                    );
                }
            }
        }

        Ok(None)
    }

    /// Walk predecessors back from `end` until `start` or a node without one.
    fn reconstruct(&self, start: NodeIndex, end: NodeIndex, combined_cost: f64) -> PathfinderResult<Route> {
        let mut hops = Vec::new();
        let mut current = end;

        while current != start {
            let Some(pred) = self.predecessor.get(&current) else {
                break;
            };
            if hops.len() >= self.graph.node_count() {
                return Err(PathfinderError::NegativeCycleSuspected {
                    relaxations: self.relaxations,
                });
            }
            hops.push(Hop {
                from: self.graph.name(pred.node).unwrap_or_default().to_string(),
                to: self.graph.name(current).unwrap_or_default().to_string(),
                cost: pred.cost,
                coherence: pred.coherence,
            });
            current = pred.node;
        }
        hops.reverse();

        let start_name = self.graph.name(start).unwrap_or_default();
        Ok(Route::from_hops(start_name, hops, combined_cost))
    }
}

/// Find the route from `start` to `end` with the lowest combined cost.
///
/// Returns `Ok(None)` when `end` is unreachable. `start == end` yields the
/// single-node route with combined cost 0. Nodes missing from the graph are
/// treated as isolated unless `config.strict_nodes` is set.
pub fn find_path(
    graph: &FlowGraph,
    start: &str,
    end: &str,
    config: &SearchConfig,
) -> PathfinderResult<Option<Route>> {
    config.validate()?;

    let start_idx = graph.node_index(start);
    let end_idx = graph.node_index(end);

    if config.strict_nodes {
        for (name, idx) in [(start, start_idx), (end, end_idx)] {
            if idx.is_none() {
                return Err(PathfinderError::UnknownNode(name.to_string()));
            }
        }
    }

    let (start_idx, end_idx) = match (start_idx, end_idx) {
        (Some(s), Some(e)) => (s, e),
        _ if start == end => {
            tracing::debug!("{} is not in the graph, returning it as its own route", start);
            return Ok(Some(Route::single(start)));
        }
        _ => {
            tracing::debug!("{} or {} is not in the graph, no route", start, end);
            return Ok(None);
        }
    };

    tracing::debug!("Coherent flow search from {} to {}", start, end);
    Search::new(graph, config).run(start_idx, end_idx)
}

/// Run many independent searches over one graph in parallel.
/// Results are in query order.
pub fn find_paths(
    graph: &FlowGraph,
    queries: &[(String, String)],
    config: &SearchConfig,
) -> Vec<PathfinderResult<Option<Route>>> {
    queries
        .par_iter()
        .map(|(start, end)| find_path(graph, start, end, config))
        .collect()
}

/// Combined cost of following `nodes` in order, or `None` if an edge is missing.
pub fn path_combined_cost(graph: &FlowGraph, nodes: &[&str], config: &SearchConfig) -> Option<f64> {
    nodes.windows(2).try_fold(0.0, |total, pair| {
        let edge = graph.edge(pair[0], pair[1])?;
        Some(total + config.edge_weight(edge))
    })
}

//! Phiflow core: flow graph model, coherence-biased pathfinder, and graph loading

pub mod graph;
pub mod model;
pub mod config;
pub mod error;
pub mod pathfinder;
pub mod loader;



pub use model::{FlowNode, FlowEdge, Hop, Route, DEFAULT_EDGE_COST, DEFAULT_EDGE_COHERENCE};
pub use graph::FlowGraph;
pub use config::{SearchConfig, PhiflowConfig};
pub use error::{PathfinderError, PathfinderResult, ConfigError, LoadError};
pub use pathfinder::{find_path, find_paths, path_combined_cost};
pub use loader::{EdgeSpec, GraphSpec, build_graph, load_graph, parse_graph_json, parse_graph_toml};

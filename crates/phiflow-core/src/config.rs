//! Search configuration and the `phiflow.toml` file format

use std::path::Path;

use phiflow_score::ScoreWeights;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PathfinderError, PathfinderResult};
use crate::model::FlowEdge;

/// Tunables for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Multiplier on each edge's traditional cost.
    /// Default: 1.0.
    pub cost_weight: f64,

    /// Multiplier on each edge's coherence, subtracted from the cost.
    /// Default: 5.0, so alignment dominates path selection.
    pub coherence_weight: f64,

    /// Lower bound applied to each edge's weighted contribution before it
    /// is added to the running cost. `Some(0.0)` keeps every increment
    /// non-negative. Default: unset, increments may be negative.
    pub weight_floor: Option<f64>,

    /// Maximum successful relaxations before the search gives up with
    /// [`PathfinderError::NegativeCycleSuspected`].
    /// Default: unset, derived as `(|V| + 1) * (|E| + 1)`.
    pub max_relaxations: Option<usize>,

    /// Fail with [`PathfinderError::UnknownNode`] when start or end is not
    /// in the graph, instead of treating it as an isolated node.
    /// Default: false.
    pub strict_nodes: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cost_weight: 1.0,
            coherence_weight: 5.0,
            weight_floor: None,
            max_relaxations: None,
            strict_nodes: false,
        }
    }
}

impl SearchConfig {
    pub fn new(cost_weight: f64, coherence_weight: f64) -> Self {
        Self {
            cost_weight,
            coherence_weight,
            ..Self::default()
        }
    }

    pub fn with_weight_floor(mut self, floor: f64) -> Self {
        self.weight_floor = Some(floor);
        self
    }

    pub fn with_max_relaxations(mut self, limit: usize) -> Self {
        self.max_relaxations = Some(limit);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_nodes = true;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> PathfinderResult<()> {
        if !self.cost_weight.is_finite() || self.cost_weight < 0.0 {
            return Err(PathfinderError::InvalidConfig(format!(
                "cost_weight must be finite and >= 0, got {}",
                self.cost_weight
            )));
        }
        if !self.coherence_weight.is_finite() || self.coherence_weight < 0.0 {
            return Err(PathfinderError::InvalidConfig(format!(
                "coherence_weight must be finite and >= 0, got {}",
                self.coherence_weight
            )));
        }
        if let Some(floor) = self.weight_floor {
            if !floor.is_finite() {
                return Err(PathfinderError::InvalidConfig(format!(
                    "weight_floor must be finite, got {floor}"
                )));
            }
        }
        if self.max_relaxations == Some(0) {
            return Err(PathfinderError::InvalidConfig(
                "max_relaxations must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The relaxation cap for a graph of the given size.
    pub fn relaxation_cap(&self, node_count: usize, edge_count: usize) -> usize {
        self.max_relaxations.unwrap_or_else(|| {
            node_count
                .saturating_add(1)
                .saturating_mul(edge_count.saturating_add(1))
        })
    }

    /// Weighted contribution of one edge, after the floor.
    pub(crate) fn edge_weight(&self, edge: &FlowEdge) -> f64 {
        let weight = edge.weighted(self.cost_weight, self.coherence_weight);
        match self.weight_floor {
            Some(floor) => weight.max(floor),
            None => weight,
        }
    }
}

/// Contents of a `phiflow.toml` file.
///
/// ```toml
/// [search]
/// cost_weight = 1.0
/// coherence_weight = 5.0
/// weight_floor = 0.0
///
/// [score]
/// ratio = 0.4
/// efficiency = 0.4
/// entropy = 0.2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhiflowConfig {
    pub search: SearchConfig,
    /// Weights for coherence computed from `energy` blocks in graph files.
    pub score: ScoreWeights,
}

impl PhiflowConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PhiflowConfig = toml::from_str(text)?;
        config.search.validate()?;
        config
            .score
            .validate()
            .map_err(|e| PathfinderError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

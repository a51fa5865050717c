//! Error types for searches, configuration and graph loading

use std::path::PathBuf;
use thiserror::Error;

/// Why a search could not produce an answer.
///
/// An unreachable end node is not an error: searches return `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathfinderError {
    /// Start or end is not in the graph (strict node policy only).
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Search weights or caps are out of range.
    #[error("invalid search config: {0}")]
    InvalidConfig(String),

    /// The relaxation cap was exceeded or the predecessor chain loops.
    #[error("negative cycle suspected after {relaxations} relaxations")]
    NegativeCycleSuspected { relaxations: usize },
}

pub type PathfinderResult<T> = Result<T, PathfinderError>;

/// Failure reading a search config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] PathfinderError),
}

/// Failure reading a graph description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("graph JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported graph file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    /// An edge gave both an explicit coherence and an energy transfer.
    #[error("edge {from} -> {to} sets both `coherence` and `energy`")]
    AmbiguousCoherence { from: String, to: String },

    #[error(transparent)]
    Score(#[from] phiflow_score::ScoreError),
}

//! Phi-coherence scoring
//!
//! Produces the per-edge coherence values consumed by the pathfinder in
//! `phiflow-core`. Scores are heuristic blends in `[0, 1]`; higher means
//! more "aligned" with the golden ratio.

pub mod energy;
pub mod sequence;


use thiserror::Error;

/// The golden ratio, `(1 + sqrt 5) / 2`.
pub const PHI: f64 = 1.618_033_988_749_895;

/// `1 / PHI`, equal to `PHI - 1`.
pub const PHI_INV: f64 = 0.618_033_988_749_895;

/// Scoring failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// A weight was negative, NaN or infinite.
    #[error("invalid score weights: {0}")]
    InvalidWeights(String),
}

pub type ScoreResult<T> = Result<T, ScoreError>;

/// How close a ratio sits to PHI, mapped into `(0, 1]`.
pub fn phi_closeness(ratio: f64) -> f64 {
    1.0 / (1.0 + (ratio - PHI).abs())
}

pub use energy::{EnergyTransfer, ScoreWeights, energy_coherence_score};
pub use sequence::sequence_phi_deviation;

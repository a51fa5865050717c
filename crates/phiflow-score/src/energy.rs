//! Energy-transfer coherence score

use serde::{Deserialize, Serialize};

use crate::{ScoreError, ScoreResult, phi_closeness};

/// Observed quantities of one energy transfer or transformation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTransfer {
    /// Magnitude before the transfer.
    pub initial_magnitude: f64,
    /// Magnitude after the transfer.
    pub final_magnitude: f64,
    /// Observed efficiency, nominally 0.0 to 1.0.
    pub efficiency: f64,
    /// Change in system entropy. Smaller (or negative) scores higher.
    pub entropy_change: f64,
}

/// Blend weights for the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub ratio: f64,
    pub efficiency: f64,
    pub entropy: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ratio: 0.4,
            efficiency: 0.4,
            entropy: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> ScoreResult<()> {
        for (name, value) in [
            ("ratio", self.ratio),
            ("efficiency", self.efficiency),
            ("entropy", self.entropy),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoreError::InvalidWeights(format!(
                    "{name} weight must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl EnergyTransfer {
    /// Closeness of the magnitude ratio (either direction) to PHI.
    /// Zero when either magnitude is not positive.
    pub fn ratio_score(&self) -> f64 {
        if self.initial_magnitude > 0.0 && self.final_magnitude > 0.0 {
            let forward = self.final_magnitude / self.initial_magnitude;
            let backward = self.initial_magnitude / self.final_magnitude;
            phi_closeness(forward).max(phi_closeness(backward))
        } else {
            0.0
        }
    }

    pub fn efficiency_score(&self) -> f64 {
        self.efficiency.clamp(0.0, 1.0)
    }

    /// `1 / (1 + dS)` for non-negative entropy change; a decrease scores 1.
    pub fn entropy_score(&self) -> f64 {
        if self.entropy_change >= 0.0 {
            1.0 / (1.0 + self.entropy_change)
        } else {
            1.0
        }
    }

    /// Score with the default weights.
    pub fn coherence(&self) -> f64 {
        energy_coherence_score(self, &ScoreWeights::default())
    }
}

/// Weighted blend of the ratio, efficiency and entropy sub-scores, clamped
/// to `[0, 1]`.
pub fn energy_coherence_score(transfer: &EnergyTransfer, weights: &ScoreWeights) -> f64 {
    let ratio = transfer.ratio_score();
    let efficiency = transfer.efficiency_score();
    let entropy = transfer.entropy_score();

    let score = ratio * weights.ratio + efficiency * weights.efficiency + entropy * weights.entropy;

    tracing::trace!(
        ratio,
        efficiency,
        entropy,
        score,
        "energy coherence sub-scores"
    );

    // NaN inputs propagate to NaN; clamp leaves them as-is.
    score.clamp(0.0, 1.0)
}

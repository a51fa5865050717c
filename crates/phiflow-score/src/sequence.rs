//! Phi-deviation of numeric sequences

use crate::{PHI, PHI_INV};

const MIN_MAGNITUDE: f64 = 1e-9;

/// Mean distance of consecutive ratios `|b| / |a|` from PHI or its inverse,
/// whichever is nearer. Lower is better.
///
/// Pairs where either value is below `1e-9` in magnitude are skipped.
/// Returns `1.0` when there are no usable pairs.
pub fn sequence_phi_deviation(values: &[f64]) -> f64 {
    let distances: Vec<f64> = values
        .windows(2)
        .filter(|pair| pair[0].abs() >= MIN_MAGNITUDE && pair[1].abs() >= MIN_MAGNITUDE)
        .map(|pair| {
            let ratio = pair[1].abs() / pair[0].abs();
            (ratio - PHI).abs().min((ratio - PHI_INV).abs())
        })
        .collect();

    if distances.is_empty() {
        return 1.0;
    }
    distances.iter().sum::<f64>() / distances.len() as f64
}

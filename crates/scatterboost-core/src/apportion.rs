//! Largest-remainder (Hamilton) apportionment of a required increase.
//!
//! Every bucket first receives the floor of its proportional share. The units
//! lost to flooring are then handed out one each to the buckets with the
//! largest fractional parts, so the integer total is exact and no bucket ends
//! more than one unit away from its ideal share. Equal fractions go to the
//! lower index first.

use serde::Serialize;

use crate::error::{CalibrationError, CalibrationResult};

/// Allowed deviation of a weight vector's sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Integer apportionment of a real-valued total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Apportionment {
    /// Unrounded proportional share per bucket.
    pub ideal: Vec<f64>,
    /// Integer share per bucket; sums to `round(total)`.
    pub increments: Vec<u64>,
    /// Units distributed by fractional-part ranking after flooring.
    pub remainder: u64,
}

impl Apportionment {
    pub fn total(&self) -> u64 {
        self.increments.iter().sum()
    }
}

/// Normalize integer sizes into weights that sum to 1.
pub fn proportional_weights(sizes: &[u64]) -> CalibrationResult<Vec<f64>> {
    let total: u64 = sizes.iter().sum();
    if total == 0 {
        return Err(CalibrationError::invalid(
            "cannot derive weights from buckets of total size zero",
        ));
    }
    Ok(sizes.iter().map(|&s| s as f64 / total as f64).collect())
}

/// Split `total_needed` across `weights`, rounding with the largest-remainder
/// method so the increments sum to exactly `round(total_needed)`.
pub fn largest_remainder(total_needed: f64, weights: &[f64]) -> CalibrationResult<Apportionment> {
    if !total_needed.is_finite() || total_needed < 0.0 {
        return Err(CalibrationError::invalid(format!(
            "total to apportion must be finite and non-negative, got {total_needed}"
        )));
    }
    validate_weights(weights)?;

    let ideal: Vec<f64> = weights.iter().map(|w| total_needed * w).collect();
    let mut increments: Vec<u64> = ideal.iter().map(|v| v.floor() as u64).collect();

    let floored: u64 = increments.iter().sum();
    let target = total_needed.round() as u64;
    let remainder = target as i64 - floored as i64;
    if remainder < 0 || remainder as usize > weights.len() {
        return Err(CalibrationError::Apportionment {
            remainder,
            buckets: weights.len(),
        });
    }

    // Stable sort keeps lower indices ahead on equal fractions.
    let mut order: Vec<usize> = (0..ideal.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = ideal[a] - ideal[a].floor();
        let fb = ideal[b] - ideal[b].floor();
        fb.total_cmp(&fa)
    });
    for &idx in order.iter().take(remainder as usize) {
        increments[idx] += 1;
    }

    log::debug!(
        "apportioned {target} unit(s) over {} bucket(s): {floored} floored + {remainder} by remainder",
        weights.len()
    );

    Ok(Apportionment {
        ideal,
        increments,
        remainder: remainder as u64,
    })
}

fn validate_weights(weights: &[f64]) -> CalibrationResult<()> {
    if weights.is_empty() {
        return Err(CalibrationError::invalid("no buckets to apportion over"));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(CalibrationError::invalid(format!(
            "weights must be finite and non-negative, got {w}"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(CalibrationError::invalid(format!(
            "weights must sum to 1, got {sum}"
        )));
    }
    Ok(())
}

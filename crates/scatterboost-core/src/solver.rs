//! Inverse tail search: the smallest grid probability whose tail meets a target.
//!
//! Candidate probabilities are the points `i * step` for `i = 0, 1, ...` that
//! do not exceed 1. Points are computed by multiplication rather than repeated
//! addition so the grid never drifts. Because the tail is non-decreasing in
//! `p`, a forward scan and a bisection over grid indices land on the same
//! point; bisection just needs far fewer evaluations.

use serde::{Deserialize, Serialize};

use crate::binomial::{tail_unchecked, validate_trials};
use crate::error::{CalibrationError, CalibrationResult};

/// Default solver granularity.
pub const DEFAULT_STEP: f64 = 0.0001;

/// How the probability grid is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Forward scan from `p = 0`.
    #[default]
    Linear,
    /// Binary search over grid indices.
    Bisection,
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Bisection => write!(f, "bisection"),
        }
    }
}

/// Outcome of an inverse solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Solution {
    /// Solved per-element probability.
    pub p: f64,
    /// Tail probability at `p`.
    pub tail: f64,
    /// Number of tail evaluations performed.
    pub evaluations: usize,
    /// The target could only be met at certainty (or not at all); `p` is 1.0.
    pub saturated: bool,
}

impl Solution {
    fn saturated(n: u64, k: u64, evaluations: usize) -> Self {
        Self {
            p: 1.0,
            tail: tail_unchecked(1.0, n, k),
            evaluations,
            saturated: true,
        }
    }
}

/// Find the smallest grid probability `p` with `P(X >= k) >= target`,
/// `X ~ Binomial(n, p)`.
///
/// Falls back to `p = 1.0` with [`Solution::saturated`] set when no grid point
/// reaches the target. A target of certainty (`>= 1.0`) with `k >= 1` is only
/// realized exactly at `p = 1.0` and resolves there directly; rounding would
/// otherwise report a tail of 1.0 well below certainty.
pub fn solve(
    target: f64,
    n: u64,
    k: u64,
    step: f64,
    strategy: SearchStrategy,
) -> CalibrationResult<Solution> {
    if target.is_nan() {
        return Err(CalibrationError::invalid("target probability is NaN"));
    }
    validate_step(step)?;
    validate_trials(n)?;

    if target >= 1.0 && k >= 1 {
        log::debug!("target {target} demands certainty; resolving to p=1");
        return Ok(Solution::saturated(n, k, 0));
    }

    let last = last_index(step);
    let solution = match strategy {
        SearchStrategy::Linear => linear_scan(target, n, k, step, last),
        SearchStrategy::Bisection => bisect(target, n, k, step, last),
    };
    if solution.saturated {
        log::warn!(
            "target tail {target:.6} unreachable below p=1 for n={n}, k={k}; saturating"
        );
    } else {
        log::debug!(
            "{strategy} solve: p={:.6} tail={:.6} after {} evaluation(s)",
            solution.p,
            solution.tail,
            solution.evaluations
        );
    }
    Ok(solution)
}

pub(crate) fn validate_step(step: f64) -> CalibrationResult<()> {
    if step.is_finite() && step > 0.0 && step <= 1.0 {
        Ok(())
    } else {
        Err(CalibrationError::invalid(format!(
            "solver step {step} must lie in (0, 1]"
        )))
    }
}

/// Largest `i` with `i * step <= 1`, tolerating representation error in `step`.
fn last_index(step: f64) -> u64 {
    (1.0 / step + 1e-9).floor() as u64
}

fn grid_point(i: u64, step: f64) -> f64 {
    (i as f64 * step).min(1.0)
}

fn linear_scan(target: f64, n: u64, k: u64, step: f64, last: u64) -> Solution {
    let mut evaluations = 0;
    for i in 0..=last {
        let p = grid_point(i, step);
        let tail = tail_unchecked(p, n, k);
        evaluations += 1;
        if tail >= target {
            return Solution {
                p,
                tail,
                evaluations,
                saturated: false,
            };
        }
    }
    Solution::saturated(n, k, evaluations)
}

fn bisect(target: f64, n: u64, k: u64, step: f64, last: u64) -> Solution {
    let mut evaluations = 1;
    if tail_unchecked(grid_point(last, step), n, k) < target {
        return Solution::saturated(n, k, evaluations);
    }

    // Invariant: grid point `hi` meets the target; every index below `lo` misses.
    let (mut lo, mut hi) = (0u64, last);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        evaluations += 1;
        if tail_unchecked(grid_point(mid, step), n, k) >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    let p = grid_point(hi, step);
    Solution {
        p,
        tail: tail_unchecked(p, n, k),
        evaluations,
        saturated: false,
    }
}

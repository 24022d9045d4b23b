//! Binomial tail probability: chance of at least `k` hits on an `n`-cell grid.
//!
//! Evaluated by direct summation of the lower tail and taking the complement:
//!
//! ```text
//! P(X >= k) = 1 - sum_{i=0}^{k-1} C(n, i) * p^i * (1 - p)^(n - i)
//! ```
//!
//! Each term is formed in log space, `exp(ln C(n, i) + i ln p + (n - i) ln q)`,
//! so `C(n, i)` cannot overflow and `q^(n - i)` cannot underflow on large
//! grids. The result is clamped to `[0, 1]` to absorb rounding drift.

use statrs::function::factorial::ln_binomial;

use crate::error::{CalibrationError, CalibrationResult};

/// `P(X >= k)` for `X ~ Binomial(n, p)`.
///
/// - `k == 0` yields exactly `1.0`.
/// - `k > n` yields `0.0` (more hits than cells is impossible).
/// - `p` outside `[0, 1]` (or NaN) and `n == 0` are rejected.
pub fn prob_at_least(p: f64, n: u64, k: u64) -> CalibrationResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(CalibrationError::invalid(format!(
            "probability {p} is outside [0, 1]"
        )));
    }
    validate_trials(n)?;
    let tail = tail_unchecked(p, n, k);
    if !tail.is_finite() {
        return Err(CalibrationError::invalid(format!(
            "tail probability for p={p}, n={n}, k={k} is not finite"
        )));
    }
    Ok(tail)
}

pub(crate) fn validate_trials(n: u64) -> CalibrationResult<()> {
    if n == 0 {
        return Err(CalibrationError::invalid("grid must have at least one cell"));
    }
    Ok(())
}

/// Tail evaluation without argument checks. Callers guarantee `p ∈ [0, 1]`
/// and `n >= 1`.
pub(crate) fn tail_unchecked(p: f64, n: u64, k: u64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    if k > n {
        return 0.0;
    }
    // ln(0) would turn the boundary terms into 0 * -inf.
    if p == 0.0 {
        return 0.0;
    }
    if p == 1.0 {
        return 1.0;
    }
    let (ln_p, ln_q) = (p.ln(), (1.0 - p).ln());
    let below: f64 = (0..k)
        .map(|i| (ln_binomial(n, i) + i as f64 * ln_p + (n - i) as f64 * ln_q).exp())
        .sum();
    (1.0 - below).clamp(0.0, 1.0)
}

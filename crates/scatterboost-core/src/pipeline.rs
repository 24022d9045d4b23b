//! The full calibration pass.
//!
//! ```text
//! Dataset → estimate → tail(p_single) → target = min(tail * multiplier, 1)
//!         → solve(target) → needed = p_new * elements - hits
//!         → largest-remainder split by sequence length
//! ```
//!
//! Every stage consumes immutable inputs and returns a fresh value, so running
//! [`calibrate`] twice on the same dataset yields identical reports.

use serde::Serialize;

use crate::apportion::{largest_remainder, proportional_weights};
use crate::binomial::prob_at_least;
use crate::config::CalibrationConfig;
use crate::dataset::Dataset;
use crate::error::CalibrationResult;
use crate::estimator::{EmpiricalEstimate, estimate};
use crate::solver::{Solution, solve};

/// Per-sequence outcome of the apportionment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceAllocation {
    pub index: usize,
    pub length: usize,
    pub existing_hits: usize,
    /// Unrounded proportional share of the required increase.
    pub ideal_share: f64,
    pub additional_hits: u64,
}

/// Everything a calibration pass computes, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub category: String,
    pub config: CalibrationConfig,
    pub grid_size: u64,
    pub estimate: EmpiricalEstimate,
    /// Tail probability at the empirical hit rate.
    pub current_prob: f64,
    /// `min(current_prob * multiplier, 1)`.
    pub target_prob: f64,
    pub solution: Solution,
    /// Additional hits required to move the hit rate to `solution.p`.
    pub total_needed: f64,
    pub allocations: Vec<SequenceAllocation>,
    /// Sum of `additional_hits`; equals `round(total_needed)`.
    pub total_added: u64,
    /// Hit rate once the additional hits are inserted as new elements.
    pub new_p_single: f64,
    /// Tail probability at `new_p_single`.
    pub achieved_prob: f64,
}

impl CalibrationReport {
    /// Required increase rounded up, as shown to operators.
    pub fn total_needed_ceil(&self) -> u64 {
        self.total_needed.ceil() as u64
    }
}

/// Run one calibration pass over `dataset`.
pub fn calibrate(
    dataset: &Dataset,
    config: &CalibrationConfig,
) -> CalibrationResult<CalibrationReport> {
    config.validate()?;
    let n = config.grid_size();
    let k = config.threshold;

    let est = estimate(dataset, &config.hit_symbol)?;
    let current_prob = prob_at_least(est.p_single, n, k)?;
    let target_prob = (current_prob * config.target_multiplier).min(1.0);
    log::info!(
        "{}: p_single={:.4}, P(X>={k}) on {n} cells = {current_prob:.4}, target {target_prob:.4}",
        dataset.category,
        est.p_single
    );

    let solution = solve(target_prob, n, k, config.step, config.strategy)?;

    let mut total_needed = solution.p * est.total_elements as f64 - est.total_hits as f64;
    if total_needed < 0.0 {
        log::warn!(
            "solved p={:.4} is below the empirical rate {:.4}; no hits will be removed",
            solution.p,
            est.p_single
        );
        total_needed = 0.0;
    }

    let lengths: Vec<u64> = dataset.sequences.iter().map(|s| s.len() as u64).collect();
    let weights = proportional_weights(&lengths)?;
    let split = largest_remainder(total_needed, &weights)?;

    let allocations: Vec<SequenceAllocation> = dataset
        .sequences
        .iter()
        .zip(split.ideal.iter().zip(&split.increments))
        .enumerate()
        .map(|(index, (seq, (&ideal_share, &additional_hits)))| SequenceAllocation {
            index,
            length: seq.len(),
            existing_hits: seq.hit_count(&config.hit_symbol),
            ideal_share,
            additional_hits,
        })
        .collect();

    let total_added = split.total();
    let new_p_single =
        (est.total_hits + total_added) as f64 / (est.total_elements + total_added) as f64;
    let achieved_prob = prob_at_least(new_p_single, n, k)?;
    log::info!(
        "{}: adding {total_added} hit(s) moves p_single to {new_p_single:.4} (P = {achieved_prob:.4})",
        dataset.category
    );

    Ok(CalibrationReport {
        category: dataset.category.clone(),
        config: config.clone(),
        grid_size: n,
        estimate: est,
        current_prob,
        target_prob,
        solution,
        total_needed,
        allocations,
        total_added,
        new_p_single,
        achieved_prob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sequence;
    use crate::error::CalibrationError;
    use crate::solver::SearchStrategy;

    fn seq_with_hits(len: usize, hits: usize) -> Sequence {
        Sequence::new((0..len).map(|i| if i % 5 == 0 && i / 5 < hits { "1" } else { "4" }))
    }

    fn sample() -> Dataset {
        Dataset::new(
            "default",
            vec![
                seq_with_hits(40, 1),
                seq_with_hits(55, 2),
                seq_with_hits(35, 1),
                seq_with_hits(60, 2),
                seq_with_hits(50, 1),
            ],
        )
    }

    #[test]
    fn test_sample_fixture_counts() {
        let ds = sample();
        assert_eq!(ds.total_elements(), 240);
        let hits: usize = ds.sequences.iter().map(|s| s.hit_count("1")).sum();
        assert_eq!(hits, 7);
    }

    #[test]
    fn test_calibrate_end_to_end() {
        let ds = sample();
        let report = calibrate(&ds, &CalibrationConfig::default()).unwrap();

        assert_eq!(report.grid_size, 25);
        assert_eq!(report.estimate.total_elements, 240);
        assert_eq!(report.estimate.total_hits, 7);
        assert!(report.target_prob <= 1.0);
        assert!((report.target_prob - (report.current_prob * 4.0).min(1.0)).abs() < 1e-15);
        assert!(report.solution.tail >= report.target_prob);
        assert!(report.solution.p >= report.estimate.p_single);

        assert_eq!(report.allocations.len(), 5);
        assert_eq!(report.total_added, report.total_needed.round() as u64);
        let sum: u64 = report.allocations.iter().map(|a| a.additional_hits).sum();
        assert_eq!(sum, report.total_added);
        assert!(report.total_needed_ceil() >= report.total_added);
        assert!(report.new_p_single > report.estimate.p_single);
        assert!(report.achieved_prob > report.current_prob);
    }

    #[test]
    fn test_longer_sequences_get_more() {
        let ds = Dataset::new("x", vec![seq_with_hits(10, 0), seq_with_hits(90, 1)]);
        let report = calibrate(&ds, &CalibrationConfig::default()).unwrap();
        assert!(report.allocations[1].additional_hits >= report.allocations[0].additional_hits);
    }

    #[test]
    fn test_idempotent() {
        let ds = sample();
        let cfg = CalibrationConfig::default();
        let a = calibrate(&ds, &cfg).unwrap();
        let b = calibrate(&ds, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_strategies_agree_on_pipeline() {
        let ds = sample();
        let linear = calibrate(&ds, &CalibrationConfig::default()).unwrap();
        let bisect = calibrate(
            &ds,
            &CalibrationConfig {
                strategy: SearchStrategy::Bisection,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(linear.solution.p, bisect.solution.p);
        assert_eq!(linear.allocations, bisect.allocations);
    }

    #[test]
    fn test_no_hits_needs_nothing() {
        let ds = Dataset::new("x", vec![seq_with_hits(30, 0), seq_with_hits(20, 0)]);
        let report = calibrate(&ds, &CalibrationConfig::default()).unwrap();
        assert_eq!(report.current_prob, 0.0);
        assert_eq!(report.target_prob, 0.0);
        assert_eq!(report.solution.p, 0.0);
        assert_eq!(report.total_added, 0);
        assert!(report.allocations.iter().all(|a| a.additional_hits == 0));
    }

    #[test]
    fn test_zero_threshold_clamps_to_no_change() {
        let ds = sample();
        let cfg = CalibrationConfig {
            threshold: 0,
            ..Default::default()
        };
        let report = calibrate(&ds, &cfg).unwrap();
        assert_eq!(report.current_prob, 1.0);
        assert_eq!(report.solution.p, 0.0);
        assert_eq!(report.total_needed, 0.0);
        assert_eq!(report.total_added, 0);
    }

    #[test]
    fn test_saturated_target_fills_to_certainty() {
        let ds = Dataset::new("x", vec![seq_with_hits(10, 2), seq_with_hits(20, 3)]);
        let cfg = CalibrationConfig {
            target_multiplier: 100.0,
            ..Default::default()
        };
        let report = calibrate(&ds, &cfg).unwrap();
        assert_eq!(report.target_prob, 1.0);
        assert!(report.solution.saturated);
        assert_eq!(report.solution.p, 1.0);
        // Every non-hit element is matched by one added hit.
        assert_eq!(report.total_added, 25);
        assert_eq!(report.allocations[0].additional_hits + report.allocations[1].additional_hits, 25);
    }

    #[test]
    fn test_large_grid_stays_finite() {
        use statrs::distribution::{Binomial, DiscreteCDF};

        let ds = Dataset::new("big", (0..10).map(|_| seq_with_hits(100, 10)).collect());
        let cfg = CalibrationConfig {
            rows: 100,
            cols: 100,
            threshold: 1_000,
            target_multiplier: 1.5,
            strategy: SearchStrategy::Bisection,
            ..Default::default()
        };
        let report = calibrate(&ds, &cfg).unwrap();
        assert_eq!(report.estimate.p_single, 0.1);

        let want = Binomial::new(0.1, 10_000).unwrap().sf(999);
        assert!(report.current_prob.is_finite());
        assert!((report.current_prob - want).abs() < 1e-6);
        assert!(report.target_prob < 1.0);
        assert!(!report.solution.saturated);
        assert!(report.solution.p > 0.1 && report.solution.p < 0.11);
        assert!(report.solution.tail >= report.target_prob);
        assert!(report.achieved_prob.is_finite());
    }

    #[test]
    fn test_empty_dataset_fails() {
        let ds = Dataset::new("empty", Vec::new());
        let err = calibrate(&ds, &CalibrationConfig::default()).unwrap_err();
        assert!(matches!(err, CalibrationError::EmptyDataset { .. }));
    }

    #[test]
    fn test_invalid_config_fails_before_estimation() {
        let cfg = CalibrationConfig {
            threshold: 26,
            ..Default::default()
        };
        let err = calibrate(&Dataset::new("empty", Vec::new()), &cfg).unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidInput(_)));
    }
}

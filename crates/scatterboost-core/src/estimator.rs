//! Empirical hit-rate estimation over a dataset.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{CalibrationError, CalibrationResult};

/// Aggregate counts over every sequence plus their ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmpiricalEstimate {
    pub total_elements: u64,
    pub total_hits: u64,
    /// `total_hits / total_elements`, always within `[0, 1]`.
    pub p_single: f64,
}

/// Count elements and hits across `dataset` and derive the per-element hit rate.
///
/// Fails with [`CalibrationError::EmptyDataset`] when there are no elements.
pub fn estimate(dataset: &Dataset, hit_symbol: &str) -> CalibrationResult<EmpiricalEstimate> {
    let (total_elements, total_hits) =
        dataset
            .sequences
            .iter()
            .fold((0u64, 0u64), |(elements, hits), seq| {
                (
                    elements + seq.len() as u64,
                    hits + seq.hit_count(hit_symbol) as u64,
                )
            });

    if total_elements == 0 {
        return Err(CalibrationError::EmptyDataset {
            category: dataset.category.clone(),
        });
    }

    let p_single = total_hits as f64 / total_elements as f64;
    log::debug!(
        "{}: {total_hits} hit(s) over {total_elements} element(s), p_single={p_single:.6}",
        dataset.category
    );

    Ok(EmpiricalEstimate {
        total_elements,
        total_hits,
        p_single,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sequence;

    fn seq_with_hits(len: usize, hits: usize) -> Sequence {
        Sequence::new((0..len).map(|i| if i < hits { "1" } else { "2" }))
    }

    #[test]
    fn test_estimate_two_sequences() {
        let ds = Dataset::new("default", vec![seq_with_hits(10, 2), seq_with_hits(20, 3)]);
        let est = estimate(&ds, "1").unwrap();
        assert_eq!(est.total_elements, 30);
        assert_eq!(est.total_hits, 5);
        assert!((est.p_single - 5.0 / 30.0).abs() < 1e-12);
        assert_eq!(format!("{:.4}", est.p_single), "0.1667");
    }

    #[test]
    fn test_estimate_respects_hit_symbol() {
        let ds = Dataset::new("x", vec![Sequence::new(["1", "7", "7", "2"])]);
        let est = estimate(&ds, "7").unwrap();
        assert_eq!(est.total_hits, 2);
        assert_eq!(est.p_single, 0.5);
    }

    #[test]
    fn test_estimate_no_hits_is_zero() {
        let ds = Dataset::new("x", vec![seq_with_hits(8, 0)]);
        assert_eq!(estimate(&ds, "1").unwrap().p_single, 0.0);
    }

    #[test]
    fn test_estimate_all_hits_is_one() {
        let ds = Dataset::new("x", vec![seq_with_hits(4, 4), seq_with_hits(3, 3)]);
        assert_eq!(estimate(&ds, "1").unwrap().p_single, 1.0);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let ds = Dataset::new("empty", Vec::new());
        let err = estimate(&ds, "1").unwrap_err();
        assert!(matches!(err, CalibrationError::EmptyDataset { ref category } if category == "empty"));
    }

    #[test]
    fn test_dataset_of_empty_sequences_rejected() {
        let ds = Dataset::new("blank", vec![Sequence::from_packed(""), Sequence::from_packed("")]);
        assert!(estimate(&ds, "1").is_err());
    }
}

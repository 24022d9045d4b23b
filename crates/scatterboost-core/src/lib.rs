//! # scatterboost-core
//!
//! **Calibrate how often a scatter lands on the grid.**
//!
//! Given the reels of a reel set, `scatterboost-core` measures the empirical
//! per-cell scatter rate, computes the chance of a trigger (at least `k`
//! scatters on an `n`-cell grid), raises that chance by a fixed multiple, and
//! works out how many scatters each reel needs to get there.
//!
//! ## Quick Start
//!
//! ```
//! use scatterboost_core::{CalibrationConfig, Dataset, Sequence, calibrate};
//!
//! let reels = Dataset::new(
//!     "default",
//!     vec![
//!         Sequence::from_packed("1234123412"),
//!         Sequence::from_packed("23412341234123412340"),
//!     ],
//! );
//! let report = calibrate(&reels, &CalibrationConfig::default()).unwrap();
//! assert_eq!(report.estimate.total_elements, 30);
//! assert!(report.target_prob <= 1.0);
//! ```
//!
//! ## Architecture
//!
//! Estimator → Tail evaluator → Solver → Apportionment
//!
//! - [`estimator`]: totals and the empirical hit rate.
//! - [`binomial`]: `P(X >= k)` by direct summation.
//! - [`solver`]: smallest grid probability meeting a target tail.
//! - [`apportion`]: largest-remainder split of the required increase.
//! - [`pipeline`]: wires the four together into a [`CalibrationReport`].
//!
//! The core never touches the filesystem except through the explicit
//! loaders on [`ReelSetFile`] and [`CalibrationConfig`].

pub mod apportion;
pub mod binomial;
pub mod config;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod pipeline;
pub mod solver;

pub use apportion::{Apportionment, WEIGHT_SUM_TOLERANCE, largest_remainder, proportional_weights};
pub use binomial::prob_at_least;
pub use config::CalibrationConfig;
pub use dataset::{DEFAULT_CATEGORY, DEFAULT_HIT_SYMBOL, Dataset, ReelSetFile, Sequence};
pub use error::{CalibrationError, CalibrationResult};
pub use estimator::{EmpiricalEstimate, estimate};
pub use pipeline::{CalibrationReport, SequenceAllocation, calibrate};
pub use solver::{DEFAULT_STEP, SearchStrategy, Solution, solve};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

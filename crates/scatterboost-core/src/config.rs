//! Calibration parameters, passed explicitly into every pipeline run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::DEFAULT_HIT_SYMBOL;
use crate::error::{CalibrationError, CalibrationResult};
use crate::solver::{DEFAULT_STEP, SearchStrategy, validate_step};

/// Configuration for a calibration pass.
///
/// Missing fields in a JSON config take the defaults below, which describe the
/// 5x5 grid with a three-scatter trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Visible grid rows.
    pub rows: u32,
    /// Visible grid columns.
    pub cols: u32,
    /// Minimum hit count `k` on the grid.
    pub threshold: u64,
    /// Target tail probability as a multiple of the current one (capped at 1).
    pub target_multiplier: f64,
    /// Solver grid granularity.
    pub step: f64,
    pub strategy: SearchStrategy,
    /// Symbol id counted as a hit.
    pub hit_symbol: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            threshold: 3,
            target_multiplier: 4.0,
            step: DEFAULT_STEP,
            strategy: SearchStrategy::Linear,
            hit_symbol: DEFAULT_HIT_SYMBOL.to_string(),
        }
    }
}

impl CalibrationConfig {
    /// Trial count `n = rows * cols`.
    pub fn grid_size(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    /// Check every parameter before any computation runs.
    pub fn validate(&self) -> CalibrationResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(CalibrationError::invalid(format!(
                "grid {}x{} has no cells",
                self.rows, self.cols
            )));
        }
        let n = self.grid_size();
        if self.threshold > n {
            return Err(CalibrationError::invalid(format!(
                "threshold {} exceeds grid size {n}",
                self.threshold
            )));
        }
        if !self.target_multiplier.is_finite() || self.target_multiplier < 0.0 {
            return Err(CalibrationError::invalid(format!(
                "target multiplier {} must be finite and non-negative",
                self.target_multiplier
            )));
        }
        validate_step(self.step)?;
        if self.hit_symbol.is_empty() {
            return Err(CalibrationError::invalid("hit symbol must not be empty"));
        }
        Ok(())
    }

    /// Load a JSON config from disk and validate it.
    pub fn load_from_path(path: &Path) -> CalibrationResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CalibrationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| CalibrationError::Json {
            origin: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

use scatterboost_core::{CalibrationResult, prob_at_least};

use super::ConfigOverrides;
use crate::GridArgs;

pub fn run(p: f64, grid: &GridArgs) -> CalibrationResult<()> {
    let config = super::build_config(&ConfigOverrides::grid_only(grid))?;
    let n = config.grid_size();
    let tail = prob_at_least(p, n, config.threshold)?;
    println!(
        "P(X >= {}) on {} cells at p = {p:.4}: {tail:.4}",
        config.threshold, n
    );
    Ok(())
}

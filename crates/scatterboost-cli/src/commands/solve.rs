use scatterboost_core::{CalibrationResult, solve};

use super::ConfigOverrides;
use crate::GridArgs;

pub fn run(target: f64, grid: &GridArgs) -> CalibrationResult<()> {
    let config = super::build_config(&ConfigOverrides::grid_only(grid))?;
    let n = config.grid_size();
    let solution = solve(target, n, config.threshold, config.step, config.strategy)?;

    println!(
        "Smallest p with P(X >= {}) >= {target:.4} on {n} cells: {:.4}",
        config.threshold, solution.p
    );
    println!(
        "  achieved {:.4} after {} {} evaluation(s)",
        solution.tail, solution.evaluations, config.strategy
    );
    if solution.saturated {
        println!("  target only reachable at certainty; p saturated at 1.0");
    }
    Ok(())
}

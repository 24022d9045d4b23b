pub mod calibrate;
pub mod categories;
pub mod solve;
pub mod tail;

use std::path::Path;

use scatterboost_core::{CalibrationConfig, CalibrationResult, SearchStrategy};

use crate::GridArgs;

/// Sources of configuration for a run, lowest precedence first:
/// built-in defaults, then the JSON config file, then individual flags.
pub struct ConfigOverrides<'a> {
    pub config_path: Option<&'a str>,
    pub grid: &'a GridArgs,
    pub multiplier: Option<f64>,
    pub hit_symbol: Option<&'a str>,
}

impl<'a> ConfigOverrides<'a> {
    /// Overrides carrying only grid flags.
    pub fn grid_only(grid: &'a GridArgs) -> Self {
        Self {
            config_path: None,
            grid,
            multiplier: None,
            hit_symbol: None,
        }
    }
}

/// Resolve the effective configuration and validate it.
pub fn build_config(overrides: &ConfigOverrides<'_>) -> CalibrationResult<CalibrationConfig> {
    let mut config = match overrides.config_path {
        Some(path) => CalibrationConfig::load_from_path(Path::new(path))?,
        None => CalibrationConfig::default(),
    };

    let grid = overrides.grid;
    if let Some(rows) = grid.rows {
        config.rows = rows;
    }
    if let Some(cols) = grid.cols {
        config.cols = cols;
    }
    if let Some(threshold) = grid.threshold {
        config.threshold = threshold;
    }
    if let Some(step) = grid.step {
        config.step = step;
    }
    if let Some(strategy) = grid.strategy.as_deref() {
        config.strategy = parse_strategy(strategy);
    }
    if let Some(multiplier) = overrides.multiplier {
        config.target_multiplier = multiplier;
    }
    if let Some(symbol) = overrides.hit_symbol {
        config.hit_symbol = symbol.to_string();
    }

    config.validate()?;
    log::debug!("effective config: {config:?}");
    Ok(config)
}

/// Parse a search strategy string into the enum.
pub fn parse_strategy(s: &str) -> SearchStrategy {
    match s {
        "linear" | "scan" => SearchStrategy::Linear,
        "bisection" | "bisect" | "binary" => SearchStrategy::Bisection,
        _ => {
            eprintln!("Unknown search strategy '{s}', using linear");
            SearchStrategy::Linear
        }
    }
}

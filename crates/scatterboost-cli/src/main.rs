//! CLI for scatterboost — calibrate scatter frequency across a reel set.

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scatterboost")]
#[command(about = "scatterboost — calibrate scatter frequency across a reel set")]
#[command(version = scatterboost_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Grid and solver overrides shared by the numeric subcommands.
#[derive(Args, Debug, Default)]
pub struct GridArgs {
    /// Visible grid rows (default 5)
    #[arg(long)]
    rows: Option<u32>,

    /// Visible grid columns (default 5)
    #[arg(long)]
    cols: Option<u32>,

    /// Minimum scatter count that triggers the feature (default 3)
    #[arg(long)]
    threshold: Option<u64>,

    /// Solver grid granularity (default 0.0001)
    #[arg(long)]
    step: Option<f64>,

    /// Inverse search strategy
    #[arg(long, value_parser = ["linear", "bisection"])]
    strategy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full calibration pass over one category of a reel-set file
    Calibrate {
        /// Path to the reel-set JSON file
        dataset: String,

        /// Category (reel set id) to calibrate
        #[arg(long, default_value = scatterboost_core::DEFAULT_CATEGORY)]
        category: String,

        /// JSON config file; individual flags override its fields
        #[arg(long)]
        config: Option<String>,

        #[command(flatten)]
        grid: GridArgs,

        /// Target trigger probability as a multiple of the current one (default 4)
        #[arg(long)]
        multiplier: Option<f64>,

        /// Symbol id counted as a scatter (default "1")
        #[arg(long)]
        hit_symbol: Option<String>,

        /// Write the full calibration report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Probability of at least `threshold` scatters for a per-cell probability
    Tail {
        /// Per-cell scatter probability
        #[arg(long)]
        p: f64,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Smallest per-cell probability reaching a target trigger probability
    Solve {
        /// Target trigger probability
        #[arg(long)]
        target: f64,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// List the categories of a reel-set file with their scatter counts
    Categories {
        /// Path to the reel-set JSON file
        dataset: String,

        /// Symbol id counted as a scatter
        #[arg(long, default_value = scatterboost_core::DEFAULT_HIT_SYMBOL)]
        hit_symbol: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Calibrate {
            dataset,
            category,
            config,
            grid,
            multiplier,
            hit_symbol,
            output,
        } => commands::calibrate::run(commands::calibrate::CalibrateCommandConfig {
            dataset_path: &dataset,
            category: &category,
            overrides: commands::ConfigOverrides {
                config_path: config.as_deref(),
                grid: &grid,
                multiplier,
                hit_symbol: hit_symbol.as_deref(),
            },
            output_path: output.as_deref(),
        }),
        Commands::Tail { p, grid } => commands::tail::run(p, &grid),
        Commands::Solve { target, grid } => commands::solve::run(target, &grid),
        Commands::Categories {
            dataset,
            hit_symbol,
        } => commands::categories::run(&dataset, &hit_symbol),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

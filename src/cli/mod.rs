//! Command-line parsing for the oil-drop simulator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation code. Sample and search flags can also be set
//! through `OILDROP_*` environment variables (a `.env` file is loaded first).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{
    DEFAULT_SEARCH_HIGH, DEFAULT_SEARCH_LOW, DEFAULT_SEARCH_STEP, DEFAULT_ZERO_THRESHOLD, EstimatorConfig,
    SampleConfig,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "oildrop", version, about = "Millikan oil-drop simulation and unit estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate drops, discover the unit, print the report and charts.
    Simulate(SimulateArgs),
    /// Run the estimator on your own masses or differences.
    Estimate(EstimateArgs),
    /// Redraw the charts of a previously exported run JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same pipeline as `oildrop simulate`, but renders the four
    /// charts in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Synthetic sample options.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of oil drops to simulate.
    #[arg(short = 'n', long, env = "OILDROP_DROPS", default_value_t = 50)]
    pub drops: usize,

    /// Mass of an uncharged drop.
    #[arg(long, env = "OILDROP_BASE_MASS", default_value_t = 6.5)]
    pub base_mass: f64,

    /// The true fundamental unit (hidden from the estimator).
    #[arg(short = 'u', long, env = "OILDROP_UNIT", default_value_t = 1.2)]
    pub unit: f64,

    /// Fewest electrons a drop can pick up.
    #[arg(long, env = "OILDROP_ELECTRONS_MIN", default_value_t = 1)]
    pub electrons_min: u32,

    /// Most electrons a drop can pick up.
    #[arg(long, env = "OILDROP_ELECTRONS_MAX", default_value_t = 20)]
    pub electrons_max: u32,

    /// Random seed for sample generation.
    #[arg(long, env = "OILDROP_SEED", default_value_t = 42)]
    pub seed: u64,
}

/// Candidate grid options.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Smallest candidate unit.
    #[arg(long, env = "OILDROP_SEARCH_LOW", default_value_t = DEFAULT_SEARCH_LOW)]
    pub search_low: f64,

    /// Largest candidate unit (inclusive when on the grid).
    #[arg(long, env = "OILDROP_SEARCH_HIGH", default_value_t = DEFAULT_SEARCH_HIGH)]
    pub search_high: f64,

    /// Candidate spacing.
    #[arg(long, env = "OILDROP_SEARCH_STEP", default_value_t = DEFAULT_SEARCH_STEP)]
    pub search_step: f64,

    /// Differences below this are treated as duplicate drops and ignored.
    #[arg(long, env = "OILDROP_ZERO_THRESHOLD", default_value_t = DEFAULT_ZERO_THRESHOLD)]
    pub zero_threshold: f64,
}

/// Chart size options.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Histogram bins for the step-size chart.
    #[arg(long, default_value_t = 20)]
    pub bins: usize,
}

/// Options for `oildrop simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub sample: SampleArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(flatten)]
    pub chart: ChartArgs,

    /// Skip the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Print the discussion questions after the report.
    #[arg(long)]
    pub questions: bool,

    /// Export per-drop results to CSV.
    #[arg(long = "export-csv")]
    pub export_csv: Option<PathBuf>,

    /// Export the whole run (config, drops, estimate) to JSON.
    #[arg(long = "export-run")]
    pub export_run: Option<PathBuf>,
}

/// What a list of numbers represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// Raw drop masses (sorted and differenced before estimation).
    Masses,
    /// Differences from the lightest drop.
    Diffs,
}

/// Options for `oildrop estimate`.
#[derive(Debug, Parser, Clone)]
pub struct EstimateArgs {
    /// Comma-separated drop masses.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with_all = ["diffs", "file"])]
    pub masses: Option<Vec<f64>>,

    /// Comma-separated differences from the lightest drop.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "file")]
    pub diffs: Option<Vec<f64>>,

    /// File with numbers separated by commas or whitespace (`#` comments allowed).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// How to interpret `--file`.
    #[arg(long, value_enum, default_value_t = InputKind::Masses)]
    pub input_kind: InputKind,

    #[command(flatten)]
    pub search: SearchArgs,
}

/// Options for `oildrop plot`.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Run JSON file produced by `oildrop simulate --export-run`.
    #[arg(long, value_name = "JSON")]
    pub run: PathBuf,

    #[command(flatten)]
    pub chart: ChartArgs,
}

/// Options for `oildrop tui`.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub sample: SampleArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Histogram bins for the step-size chart.
    #[arg(long, default_value_t = 20)]
    pub bins: usize,
}

impl SampleArgs {
    pub fn to_config(&self) -> SampleConfig {
        SampleConfig {
            base_mass: self.base_mass,
            true_unit: self.unit,
            drop_count: self.drops,
            electrons_min: self.electrons_min,
            electrons_max: self.electrons_max,
            seed: self.seed,
        }
    }
}

impl SearchArgs {
    pub fn to_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            search_low: self.search_low,
            search_high: self.search_high,
            search_step: self.search_step,
            zero_threshold: self.zero_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults_match_the_classroom_setup() {
        let cli = Cli::parse_from(["oildrop", "simulate"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.sample.to_config(), SampleConfig::default());
        assert_eq!(args.search.to_config(), EstimatorConfig::default());
        assert!(!args.no_plot);
    }

    #[test]
    fn estimate_accepts_comma_lists() {
        let cli = Cli::parse_from(["oildrop", "estimate", "--masses", "6.5,6.5,7.7,8.9", "--search-step", "0.05"]);
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.masses, Some(vec![6.5, 6.5, 7.7, 8.9]));
        assert_eq!(args.search.search_step, 0.05);
    }

    #[test]
    fn masses_and_diffs_conflict() {
        let res = Cli::try_parse_from(["oildrop", "estimate", "--masses", "1", "--diffs", "1"]);
        assert!(res.is_err());
    }
}

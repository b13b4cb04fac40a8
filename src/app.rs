//! Command dispatch for the `oildrop` binary.
//!
//! `main` only maps errors to exit codes. Everything else starts here: `.env`
//! and logger setup, argument parsing, and one handler per subcommand that
//! drives the pipeline and prints or exports the results.

use clap::Parser;

use crate::cli::{Command, EstimateArgs, InputKind, PlotArgs, SimulateArgs};
use crate::domain::RunConfig;
use crate::error::{AppError, EXIT_USAGE};

pub mod pipeline;

/// Entry point for the `oildrop` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();

    // `oildrop` and `oildrop --seed 7` mean `oildrop simulate ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Simulate(args) => handle_simulate(&args),
        Command::Estimate(args) => handle_estimate(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Tui(args) => crate::tui::run(&args),
    }
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args);
    let run = pipeline::run_simulation(&config.sample, &config.estimator)?;

    println!("{}", crate::report::format_run_summary(&run));

    if config.plot {
        println!(
            "{}",
            crate::plot::render_run_charts(&run, config.plot_width, config.plot_height, config.histogram_bins)
        );
    }
    if config.questions {
        println!("{}", crate::report::format_discussion_questions());
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_drops_csv(path, &run)?;
    }
    if let Some(path) = &config.export_run {
        crate::io::write_run_json(path, &run.to_run_file())?;
    }

    Ok(())
}

fn handle_estimate(args: &EstimateArgs) -> Result<(), AppError> {
    let config = args.search.to_config();

    let (values, kind) = match (&args.masses, &args.diffs, &args.file) {
        (Some(masses), _, _) => (masses.clone(), InputKind::Masses),
        (None, Some(diffs), _) => (diffs.clone(), InputKind::Diffs),
        (None, None, Some(path)) => (crate::io::read_values(path)?, args.input_kind),
        (None, None, None) => {
            return Err(AppError::new(EXIT_USAGE, "Provide --masses, --diffs, or --file."));
        }
    };

    let estimate = match kind {
        InputKind::Masses => crate::fit::estimate_unit_from_masses(&values, &config)?,
        InputKind::Diffs => crate::fit::estimate_unit(&values, &config)?,
    };
    log::info!("estimated unit {} from {} value(s)", estimate.unit, values.len());

    print!("{}", crate::report::format_estimate(&estimate));
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_run_json(&args.run)?;
    let run = pipeline::run_from_drops(&file.sample, &file.estimator, file.drops)?;

    println!("{}", crate::report::format_run_summary(&run));
    println!(
        "{}",
        crate::plot::render_run_charts(&run, args.chart.width, args.chart.height, args.chart.bins)
    );
    Ok(())
}

pub fn run_config_from_args(args: &SimulateArgs) -> RunConfig {
    RunConfig {
        sample: args.sample.to_config(),
        estimator: args.search.to_config(),
        plot: !args.no_plot,
        plot_width: args.chart.width,
        plot_height: args.chart.height,
        histogram_bins: args.chart.bins,
        questions: args.questions,
        export_csv: args.export_csv.clone(),
        export_run: args.export_run.clone(),
    }
}

/// Rewrite argv so `oildrop` defaults to `oildrop simulate`.
///
/// Rules:
/// - `oildrop`                      -> `oildrop simulate`
/// - `oildrop --seed 7 ...`         -> `oildrop simulate --seed 7 ...`
/// - `oildrop --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("simulate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "simulate" | "estimate" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "simulate flags".
    if arg1.starts_with('-') {
        argv.insert(1, "simulate".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_simulates() {
        assert_eq!(rewrite_args(argv(&["oildrop"])), argv(&["oildrop", "simulate"]));
    }

    #[test]
    fn leading_flags_go_to_simulate() {
        assert_eq!(
            rewrite_args(argv(&["oildrop", "--seed", "7"])),
            argv(&["oildrop", "simulate", "--seed", "7"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(argv(&["oildrop", "tui"])), argv(&["oildrop", "tui"]));
        assert_eq!(rewrite_args(argv(&["oildrop", "--help"])), argv(&["oildrop", "--help"]));
    }

    #[test]
    fn run_config_carries_flags() {
        let cli = crate::cli::Cli::parse_from(["oildrop", "simulate", "--no-plot", "--questions", "-n", "12"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let config = run_config_from_args(&args);
        assert!(!config.plot);
        assert!(config.questions);
        assert_eq!(config.sample.drop_count, 12);
    }
}

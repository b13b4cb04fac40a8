//! Shared simulation pipeline used by the CLI, the TUI, and `plot`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sample generation -> analysis -> unit estimation -> verification
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use crate::data::{SampleData, generate_sample, sample_from_drops, validate_sample_config};
use crate::domain::{
    Analysis, EstimatorConfig, GridScore, OilDrop, RunFile, SampleConfig, UnitEstimate, Verification,
};
use crate::error::AppError;
use crate::fit::{estimate_unit, scan_grid};
use crate::report::{analyze, verify};

/// All computed outputs of a single simulation run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sample_config: SampleConfig,
    pub estimator_config: EstimatorConfig,
    pub sample: SampleData,
    pub analysis: Analysis,
    pub estimate: UnitEstimate,
    /// Score of every probed candidate (grid order).
    pub scores: Vec<GridScore>,
    pub verification: Verification,
}

impl RunOutput {
    pub fn to_run_file(&self) -> RunFile {
        RunFile {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: chrono::Utc::now(),
            sample: self.sample_config.clone(),
            estimator: self.estimator_config,
            drops: self.sample.drops.clone(),
            estimate: self.estimate,
            verification: self.verification.clone(),
        }
    }
}

/// Generate a fresh sample and run the full pipeline on it.
pub fn run_simulation(sample_config: &SampleConfig, estimator_config: &EstimatorConfig) -> Result<RunOutput, AppError> {
    let sample = generate_sample(sample_config)?;
    log::info!(
        "generated {} drops (seed={}, electrons {}..={})",
        sample.stats.n_drops,
        sample_config.seed,
        sample_config.electrons_min,
        sample_config.electrons_max,
    );
    run_with_sample(sample_config, estimator_config, sample)
}

/// Re-run the pipeline over previously exported drops.
pub fn run_from_drops(
    sample_config: &SampleConfig,
    estimator_config: &EstimatorConfig,
    drops: Vec<OilDrop>,
) -> Result<RunOutput, AppError> {
    // Run files can be hand-edited.
    validate_sample_config(sample_config)?;
    let sample = sample_from_drops(drops)?;
    run_with_sample(sample_config, estimator_config, sample)
}

fn run_with_sample(
    sample_config: &SampleConfig,
    estimator_config: &EstimatorConfig,
    sample: SampleData,
) -> Result<RunOutput, AppError> {
    let analysis = analyze(&sample.masses(), estimator_config.zero_threshold)?;

    let estimate = estimate_unit(&analysis.differences, estimator_config)?;
    let scores = scan_grid(&analysis.differences, estimator_config)?;
    log::info!(
        "estimated unit {} (score={:.6}, {} candidates, {} differences)",
        estimate.unit,
        estimate.score,
        estimate.candidates_probed,
        estimate.differences_used,
    );

    let verification = verify(&sample, &analysis, &estimate)?;
    log::debug!(
        "verification slope={:.6} intercept={:.6} rmse={:.3e}",
        verification.slope,
        verification.intercept,
        verification.rmse,
    );

    Ok(RunOutput {
        sample_config: sample_config.clone(),
        estimator_config: *estimator_config,
        sample,
        analysis,
        estimate,
        scores,
        verification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_simulation_discovers_the_true_unit() {
        let run = run_simulation(&SampleConfig::default(), &EstimatorConfig::default()).unwrap();
        assert_eq!(run.estimate.unit, 1.2);
        assert_eq!(run.scores.len(), run.estimate.candidates_probed);
        assert!((run.verification.slope - 1.2).abs() < 1e-9);
        assert!((run.verification.intercept - 6.5).abs() < 1e-9);
        assert_eq!(run.analysis.sorted_masses.len(), 50);
    }

    #[test]
    fn recovers_other_units_across_seeds() {
        for (seed, unit) in [(1, 0.8), (2, 1.7), (3, 2.5)] {
            let sample = SampleConfig {
                true_unit: unit,
                seed,
                ..SampleConfig::default()
            };
            let run = run_simulation(&sample, &EstimatorConfig::default()).unwrap();
            assert_eq!(run.estimate.unit, unit, "seed {seed}");
        }
    }

    #[test]
    fn run_file_round_trips_through_run_from_drops() {
        let run = run_simulation(&SampleConfig::default(), &EstimatorConfig::default()).unwrap();
        let file = run.to_run_file();
        let again = run_from_drops(&file.sample, &file.estimator, file.drops.clone()).unwrap();
        assert_eq!(again.estimate, run.estimate);
        assert_eq!(again.analysis, run.analysis);
    }

    #[test]
    fn reloaded_runs_reject_a_zero_unit() {
        let run = run_simulation(&SampleConfig::default(), &EstimatorConfig::default()).unwrap();
        let file = run.to_run_file();
        let edited = SampleConfig {
            true_unit: 0.0,
            ..file.sample.clone()
        };
        let err = run_from_drops(&edited, &file.estimator, file.drops).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}

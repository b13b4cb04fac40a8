//! Reporting utilities: derived analysis, verification, and formatted output.

use crate::data::SampleData;
use crate::domain::{Analysis, GridScore, UnitEstimate, Verification};
use crate::error::{AppError, EXIT_DATA};
use crate::fit::{mass_differences, sorted_copy, step_sizes};
use crate::math::fit_line;

pub mod format;

pub use format::*;

/// Derive sorted masses, differences from the lightest drop, and step sizes.
pub fn analyze(masses: &[f64], zero_threshold: f64) -> Result<Analysis, AppError> {
    let differences = mass_differences(masses)?;
    let sorted_masses = sorted_copy(masses);
    let lightest = sorted_masses
        .first()
        .copied()
        .ok_or_else(|| AppError::new(EXIT_DATA, "No masses to analyze."))?;
    let step_sizes = step_sizes(&sorted_masses, zero_threshold);

    Ok(Analysis {
        sorted_masses,
        lightest,
        differences,
        step_sizes,
    })
}

/// Check an estimate against the electron counts behind the sample.
///
/// Electrons and masses are both sorted before pairing; mass grows with the
/// electron count, so this pairs each drop with its own charge.
pub fn verify(sample: &SampleData, analysis: &Analysis, estimate: &UnitEstimate) -> Result<Verification, AppError> {
    let mut electrons = sample.electrons();
    electrons.sort_unstable();
    let xs: Vec<f64> = electrons.iter().map(|&e| e as f64).collect();

    let line = fit_line(&xs, &analysis.sorted_masses).ok_or_else(|| {
        AppError::new(
            EXIT_DATA,
            "Verification fit is degenerate (every drop carries the same charge).",
        )
    })?;

    Ok(Verification {
        slope: line.slope,
        intercept: line.intercept,
        rmse: line.rmse,
        inferred_electrons: infer_electrons(&analysis.differences, estimate.unit),
    })
}

/// Electrons above the lightest drop implied by `unit`, per difference.
pub fn infer_electrons(differences: &[f64], unit: f64) -> Vec<u32> {
    differences
        .iter()
        .map(|&d| (d / unit).round().max(0.0) as u32)
        .collect()
}

/// Accuracy as a percentage: `100 - relative error * 100`.
pub fn accuracy_percent(estimated: f64, truth: f64) -> f64 {
    100.0 - (estimated - truth).abs() / truth * 100.0
}

/// The `n` best-scoring grid candidates (ties in grid order).
pub fn closest_candidates(scores: &[GridScore], n: usize) -> Vec<GridScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.score.total_cmp(&b.score));
    sorted.truncate(n);
    sorted
}

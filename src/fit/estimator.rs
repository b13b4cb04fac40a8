//! Unit estimation by grid search.
//!
//! Given:
//! - mass differences `d_i`, each presumed to be `(k_i - k_min) * unit`
//! - a candidate grid `[search_low, search_high]` at `search_step`
//!
//! we compute, for each candidate `c`:
//!
//! ```text
//! score(c) = Σ |d_i / c - round(d_i / c)|
//! ```
//!
//! and return the best candidate (see `selection` for tie handling).
//!
//! Everything here is a pure function of its inputs: inputs are never mutated
//! (sorting happens on a copy) and nothing is logged.

use crate::domain::{EstimatorConfig, GridScore, UnitEstimate};
use crate::fit::error::EstimateError;
use crate::fit::grid::candidate_grid;
use crate::fit::selection::select_fundamental;

/// Estimate the fundamental unit from pre-derived differences.
pub fn estimate_unit(differences: &[f64], config: &EstimatorConfig) -> Result<UnitEstimate, EstimateError> {
    let (usable, scores) = score_grid(differences, config)?;

    let idx = select_fundamental(&scores, usable.len()).ok_or(EstimateError::InvalidRange {
        low: config.search_low,
        high: config.search_high,
        step: config.search_step,
    })?;

    Ok(UnitEstimate {
        unit: scores[idx].candidate,
        score: scores[idx].score,
        candidates_probed: scores.len(),
        differences_used: usable.len(),
    })
}

/// Estimate the fundamental unit from raw masses.
///
/// The masses are sorted (on a copy), the minimum is subtracted, and the
/// resulting differences go through [`estimate_unit`].
pub fn estimate_unit_from_masses(masses: &[f64], config: &EstimatorConfig) -> Result<UnitEstimate, EstimateError> {
    let differences = mass_differences(masses)?;
    estimate_unit(&differences, config)
}

/// Score every grid candidate (grid order).
///
/// Useful for inspecting how sharply the best candidate stands out.
pub fn scan_grid(differences: &[f64], config: &EstimatorConfig) -> Result<Vec<GridScore>, EstimateError> {
    score_grid(differences, config).map(|(_, scores)| scores)
}

/// Sum of distances from each `difference / candidate` ratio to its nearest integer.
pub fn fit_score(differences: &[f64], candidate: f64) -> f64 {
    differences
        .iter()
        .map(|&d| {
            let ratio = d / candidate;
            (ratio - ratio.round()).abs()
        })
        .sum()
}

/// Masses sorted ascending, minus the lightest mass. Zeros are kept.
pub fn mass_differences(masses: &[f64]) -> Result<Vec<f64>, EstimateError> {
    ensure_finite(masses, "mass")?;
    let sorted = sorted_copy(masses);
    let Some(&lightest) = sorted.first() else {
        return Ok(Vec::new());
    };
    Ok(sorted.iter().map(|&m| m - lightest).collect())
}

/// Gaps between consecutive sorted masses at or above `threshold`.
pub fn step_sizes(sorted_masses: &[f64], threshold: f64) -> Vec<f64> {
    sorted_masses
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&step| step >= threshold)
        .collect()
}

/// Return a sorted copy of `values` (ascending, total order).
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn score_grid(
    differences: &[f64],
    config: &EstimatorConfig,
) -> Result<(Vec<f64>, Vec<GridScore>), EstimateError> {
    let grid = candidate_grid(config.search_low, config.search_high, config.search_step)?;
    let usable = usable_differences(differences, config.zero_threshold)?;

    let scores = grid
        .into_iter()
        .map(|candidate| GridScore {
            candidate,
            score: fit_score(&usable, candidate),
        })
        .collect();

    Ok((usable, scores))
}

fn usable_differences(differences: &[f64], threshold: f64) -> Result<Vec<f64>, EstimateError> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(EstimateError::InvalidInput(format!(
            "near-zero threshold must be finite and >= 0 (got {threshold})"
        )));
    }
    ensure_finite(differences, "difference")?;

    let usable: Vec<f64> = differences.iter().copied().filter(|&d| d >= threshold).collect();
    if usable.is_empty() {
        return Err(EstimateError::InsufficientData { threshold });
    }
    Ok(usable)
}

fn ensure_finite(values: &[f64], what: &str) -> Result<(), EstimateError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(EstimateError::InvalidInput(format!(
            "non-finite {what} at index {idx}: {}",
            values[idx]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn differences_for(ks: &[u32], unit: f64) -> Vec<f64> {
        let k_min = ks.iter().copied().min().unwrap();
        ks.iter().map(|&k| (k - k_min) as f64 * unit).collect()
    }

    fn on_grid(value: f64, config: &EstimatorConfig) -> bool {
        let i = (value - config.search_low) / config.search_step;
        i >= -1e-9 && (i - i.round()).abs() < 1e-9
    }

    #[test]
    fn recovers_unit_from_clean_multiples() {
        let est = estimate_unit(&[1.2, 2.4, 3.6, 4.8], &EstimatorConfig::default()).unwrap();
        assert_eq!(est.unit, 1.2);
        assert!(est.score < 1e-9);
        assert_eq!(est.candidates_probed, 26);
        assert_eq!(est.differences_used, 4);
    }

    #[test]
    fn duplicate_lightest_drop_is_filtered() {
        let masses = [6.5, 6.5, 7.7, 8.9];
        let est = estimate_unit_from_masses(&masses, &EstimatorConfig::default()).unwrap();
        assert_eq!(est.unit, 1.2);
        assert_eq!(est.differences_used, 2);
    }

    #[test]
    fn masses_are_not_mutated_and_order_does_not_matter() {
        let masses = vec![8.9, 6.5, 7.7, 6.5];
        let before = masses.clone();
        let est = estimate_unit_from_masses(&masses, &EstimatorConfig::default()).unwrap();
        assert_eq!(masses, before);
        assert_eq!(est.unit, 1.2);
    }

    #[test]
    fn exact_recovery_for_on_grid_units() {
        let config = EstimatorConfig::default();
        let ks = [3, 4, 6, 9, 13, 20];
        for unit in [0.5, 0.7, 0.9, 1.2, 1.7, 2.3, 3.0] {
            let est = estimate_unit(&differences_for(&ks, unit), &config).unwrap();
            assert!(
                (est.unit - unit).abs() <= config.search_step / 2.0,
                "unit {unit}: estimated {}",
                est.unit
            );
        }
    }

    #[test]
    fn recovers_unit_from_synthetic_masses_with_float_residue() {
        let base = 6.5;
        let unit = 1.2;
        let masses: Vec<f64> = [7, 1, 12, 3, 3, 20, 8, 2]
            .iter()
            .map(|&k| base + k as f64 * unit)
            .collect();
        let est = estimate_unit_from_masses(&masses, &EstimatorConfig::default()).unwrap();
        assert_eq!(est.unit, 1.2);
    }

    #[test]
    fn estimate_is_idempotent() {
        let diffs = [0.9, 2.7, 1.8, 0.0, 6.3];
        let config = EstimatorConfig::default();
        let a = estimate_unit(&diffs, &config).unwrap();
        let b = estimate_unit(&diffs, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_is_always_a_grid_point() {
        let config = EstimatorConfig {
            search_low: 0.55,
            search_high: 2.95,
            search_step: 0.2,
            ..EstimatorConfig::default()
        };
        for diffs in [vec![1.0, 2.3, 4.1], vec![0.33, 7.7], vec![1.2, 2.4, 3.6]] {
            let est = estimate_unit(&diffs, &config).unwrap();
            assert!(on_grid(est.unit, &config), "{} is not a grid point", est.unit);
            assert!(est.unit >= config.search_low && est.unit <= config.search_high);
        }
    }

    #[test]
    fn finer_grids_never_increase_error() {
        let diffs = differences_for(&[2, 3, 5, 8, 11], 1.2);
        let mut last_err = f64::INFINITY;
        for step in [0.1, 0.05, 0.025] {
            let config = EstimatorConfig {
                search_step: step,
                ..EstimatorConfig::default()
            };
            let err = (estimate_unit(&diffs, &config).unwrap().unit - 1.2).abs();
            assert!(err <= last_err + 1e-12, "step {step}: {err} > {last_err}");
            last_err = err;
        }
    }

    #[test]
    fn empty_or_all_zero_input_is_insufficient() {
        let config = EstimatorConfig::default();
        assert!(matches!(
            estimate_unit(&[], &config),
            Err(EstimateError::InsufficientData { .. })
        ));
        assert!(matches!(
            estimate_unit(&[0.0, 0.05, 0.09], &config),
            Err(EstimateError::InsufficientData { .. })
        ));
        assert!(matches!(
            estimate_unit_from_masses(&[6.5], &config),
            Err(EstimateError::InsufficientData { .. })
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = EstimatorConfig {
            search_low: 2.0,
            search_high: 1.0,
            search_step: 0.1,
            ..EstimatorConfig::default()
        };
        assert!(matches!(
            estimate_unit(&[1.2, 2.4], &config),
            Err(EstimateError::InvalidRange { .. })
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let config = EstimatorConfig::default();
        assert!(matches!(
            estimate_unit(&[1.2, f64::NAN], &config),
            Err(EstimateError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_unit_from_masses(&[6.5, f64::INFINITY], &config),
            Err(EstimateError::InvalidInput(_))
        ));
        let bad_threshold = EstimatorConfig {
            zero_threshold: -1.0,
            ..config
        };
        assert!(matches!(
            estimate_unit(&[1.2], &bad_threshold),
            Err(EstimateError::InvalidInput(_))
        ));
    }

    #[test]
    fn configurable_threshold_keeps_small_units() {
        let config = EstimatorConfig {
            search_low: 0.01,
            search_high: 0.2,
            search_step: 0.01,
            zero_threshold: 0.005,
        };
        let est = estimate_unit(&differences_for(&[1, 2, 4, 7], 0.03), &config).unwrap();
        assert_eq!(est.unit, 0.03);
    }

    #[test]
    fn fit_score_is_zero_for_exact_multiples() {
        assert!(fit_score(&[1.5, 3.0, 4.5], 1.5) < 1e-12);
        assert!((fit_score(&[1.5], 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn scan_grid_covers_every_candidate() {
        let scores = scan_grid(&[1.2, 2.4], &EstimatorConfig::default()).unwrap();
        assert_eq!(scores.len(), 26);
        assert_eq!(scores[0].candidate, 0.5);
        assert!(scores.iter().all(|s| s.score.is_finite() && s.score >= 0.0));
    }

    #[test]
    fn step_sizes_skip_duplicates() {
        let steps = step_sizes(&[6.5, 6.5, 7.7, 10.1], 0.1);
        assert_eq!(steps.len(), 2);
        assert!((steps[0] - 1.2).abs() < 1e-12);
        assert!((steps[1] - 2.4).abs() < 1e-12);
    }
}

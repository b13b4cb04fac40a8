//! Candidate grid generation.
//!
//! The unit is recovered with a deterministic grid search over evenly spaced
//! candidates. Grid points are rounded to the grid's own decimal resolution so
//! that `0.5 + 7 * 0.1` is reported as `1.2` rather than `1.2000000000000002`.

use crate::fit::error::EstimateError;

/// Upper bound on decimals inferred from a step or bound.
const MAX_DECIMALS: u32 = 9;

/// Refuse grids larger than this (a typo like `--search-step 1e-12`).
const MAX_GRID_POINTS: usize = 1_000_000;

/// Slack when deciding whether `high` lies on the grid.
const ENDPOINT_EPS: f64 = 1e-9;

/// Number of decimals needed to represent `value` exactly on a decimal grid.
///
/// `0.1 -> 1`, `0.25 -> 2`, `1.0 -> 0`. Values that never settle (e.g. `1/3`)
/// are capped at `MAX_DECIMALS`.
pub fn grid_decimals(value: f64) -> u32 {
    let value = value.abs();
    for d in 0..=MAX_DECIMALS {
        let scaled = value * 10f64.powi(d as i32);
        if (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0) {
            return d;
        }
    }
    MAX_DECIMALS
}

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Validate a search range.
pub fn validate_range(low: f64, high: f64, step: f64) -> Result<(), EstimateError> {
    let ok = low.is_finite()
        && high.is_finite()
        && step.is_finite()
        && low > 0.0
        && low < high
        && step > 0.0;
    if ok {
        Ok(())
    } else {
        Err(EstimateError::InvalidRange { low, high, step })
    }
}

/// Generate the closed grid `low, low + step, ...` up to and including `high`
/// when `high` falls on the grid.
pub fn candidate_grid(low: f64, high: f64, step: f64) -> Result<Vec<f64>, EstimateError> {
    validate_range(low, high, step)?;

    let span = (high - low) / step;
    if span >= MAX_GRID_POINTS as f64 {
        return Err(EstimateError::InvalidRange { low, high, step });
    }
    let last = (span + ENDPOINT_EPS).floor() as usize;
    let decimals = grid_decimals(step).max(grid_decimals(low));

    Ok((0..=last)
        .map(|i| round_to(low + step * i as f64, decimals))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_includes_both_endpoints() {
        let grid = candidate_grid(0.5, 3.0, 0.1).unwrap();
        assert_eq!(grid.len(), 26);
        assert_eq!(grid[0], 0.5);
        assert_eq!(grid[7], 1.2);
        assert_eq!(grid[25], 3.0);
    }

    #[test]
    fn off_grid_endpoint_is_not_probed() {
        let grid = candidate_grid(0.5, 1.0, 0.2).unwrap();
        assert_eq!(grid, vec![0.5, 0.7, 0.9]);
    }

    #[test]
    fn decimals_follow_step_and_low() {
        assert_eq!(grid_decimals(0.1), 1);
        assert_eq!(grid_decimals(0.25), 2);
        assert_eq!(grid_decimals(1.0), 0);

        let grid = candidate_grid(0.55, 0.8, 0.1).unwrap();
        assert_eq!(grid, vec![0.55, 0.65, 0.75]);
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(matches!(
            candidate_grid(2.0, 1.0, 0.1),
            Err(EstimateError::InvalidRange { .. })
        ));
        assert!(candidate_grid(0.5, 3.0, 0.0).is_err());
        assert!(candidate_grid(0.5, 3.0, -0.1).is_err());
        assert!(candidate_grid(0.0, 3.0, 0.1).is_err());
        assert!(candidate_grid(0.5, f64::INFINITY, 0.1).is_err());
        assert!(candidate_grid(0.5, 3.0, 1e-12).is_err());
    }
}

//! Least squares solver.
//!
//! The verification step regresses drop mass on electron count:
//!
//! ```text
//! mass_i ≈ intercept + slope * electrons_i
//! ```
//!
//! A correct unit estimate shows up as `slope ≈ unit` and `intercept ≈ base mass`.
//!
//! The design matrix has one row per drop and two columns, so it is solved
//! through SVD (nalgebra's `QR::solve` only handles square systems). Equal
//! electron counts everywhere make it rank-deficient and yield `None`.

use nalgebra::{DMatrix, DVector};

/// A fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub rmse: f64,
}

/// Least-squares coefficients for `x * beta ≈ y`, or `None` when no finite
/// solution exists at any of the tried singular-value cutoffs.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    [1e-10, 1e-8, 1e-6]
        .iter()
        .filter_map(|&eps| svd.solve(y, eps).ok())
        .find(|beta| beta.iter().all(|v| v.is_finite()))
}

/// Fit a straight line through `(xs[i], ys[i])`.
///
/// Returns `None` for mismatched lengths, fewer than two points, or when all
/// `x` values coincide.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(x_max - x_min > 1e-12) {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { xs[r] });
    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &y)?;

    let (intercept, slope) = (beta[0], beta[1]);
    let sse: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &yi)| {
            let r = yi - (intercept + slope * x);
            r * r
        })
        .sum();

    Some(LineFit {
        intercept,
        slope,
        rmse: (sse / n as f64).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svd_handles_tall_systems() {
        // mass = 6.5 + 1.2 * electrons, four drops
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 5.0, 1.0, 7.0]);
        let y = DVector::from_row_slice(&[7.7, 8.9, 12.5, 14.9]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 6.5).abs() < 1e-9);
        assert!((beta[1] - 1.2).abs() < 1e-9);
    }

    #[test]
    fn fit_line_recovers_base_mass_and_unit() {
        let xs = [1.0, 3.0, 4.0, 9.0, 15.0];
        let ys: Vec<f64> = xs.iter().map(|x| 6.5 + 1.2 * x).collect();
        let fit = fit_line(&xs, &ys).unwrap();
        assert!((fit.intercept - 6.5).abs() < 1e-9);
        assert!((fit.slope - 1.2).abs() < 1e-9);
        assert!(fit.rmse < 1e-9);
    }

    #[test]
    fn fit_line_rejects_degenerate_inputs() {
        assert!(fit_line(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(fit_line(&[1.0], &[1.0]).is_none());
        assert!(fit_line(&[1.0, 2.0], &[1.0]).is_none());
    }
}

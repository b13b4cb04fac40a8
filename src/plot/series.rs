//! Chart data preparation shared by the ASCII charts and the TUI.
//!
//! Everything here is pure: series and bounds are computed from a run so the
//! renderers only draw.

use crate::app::pipeline::RunOutput;

/// Number of theoretical multiples `i * unit` overlaid on the difference chart.
pub const THEORY_MULTIPLES: u32 = 20;

/// Equal-width histogram over `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }

    /// Left and right edge of bin `i`.
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        (self.lo + w * i as f64, self.lo + w * (i + 1) as f64)
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin finite `values` into `bins` equal-width buckets spanning their range.
///
/// A degenerate range (all values equal) is widened by ±0.5 so the single
/// bar has a visible width. Returns `None` when there are no finite values.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (mut lo, mut hi) = value_range(&finite)?;
    if hi - lo < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }

    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { lo, hi, counts })
}

/// `(i, value)` pairs, indexed from 0.
pub fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect()
}

/// Theoretical levels `i * unit` (i = 1..=THEORY_MULTIPLES) not above `y_max`.
pub fn theory_levels(unit: f64, y_max: f64) -> Vec<f64> {
    (1..=THEORY_MULTIPLES)
        .map(|i| i as f64 * unit)
        .filter(|&y| y <= y_max)
        .collect()
}

/// Sorted electron counts paired with sorted masses.
pub fn verification_points(run: &RunOutput) -> Vec<(f64, f64)> {
    let mut electrons = run.sample.electrons();
    electrons.sort_unstable();
    electrons
        .iter()
        .zip(&run.analysis.sorted_masses)
        .map(|(&e, &m)| (e as f64, m))
        .collect()
}

/// Endpoints of the line `mass = base + electrons * unit` across `[e_min, e_max]`.
pub fn theory_line(base: f64, unit: f64, e_min: f64, e_max: f64) -> [(f64, f64); 2] {
    [(e_min, base + e_min * unit), (e_max, base + e_max * unit)]
}

/// `(min, max)` of `values`, or `None` when empty.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Widen `[min, max]` by `frac` of its span on both sides.
pub fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let h = histogram(&[1.2, 1.2, 2.4, 3.6, 1.2], 3).unwrap();
        assert_eq!(h.counts, vec![3, 1, 1]);
        assert_eq!(h.max_count(), 3);
        assert!((h.bin_width() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn histogram_widens_degenerate_ranges() {
        let h = histogram(&[1.2, 1.2], 4).unwrap();
        assert!((h.lo - 0.7).abs() < 1e-12);
        assert!((h.hi - 1.7).abs() < 1e-12);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn histogram_of_nothing_is_none() {
        assert!(histogram(&[], 5).is_none());
        assert!(histogram(&[f64::NAN], 5).is_none());
    }

    #[test]
    fn theory_levels_stop_at_the_chart_top() {
        assert_eq!(theory_levels(1.5, 4.6), vec![1.5, 3.0, 4.5]);
        assert_eq!(theory_levels(1.0, 100.0).len(), THEORY_MULTIPLES as usize);
    }
}

//! Choosing the fundamental unit from a scored grid.
//!
//! Selection rules:
//! 1. The lowest score wins; among equal scores the first (lowest) candidate wins.
//! 2. Scores within `TIE_TOLERANCE_PER_DIFFERENCE * n` of the minimum count as equal,
//!    so floating-point residue (`3.6 / 1.2 = 3.0000000000000004`) cannot reorder them.
//! 3. Among tied candidates, a candidate that divides another tied candidate an integer
//!    number of times (`0.6` vs `1.2`) is a sub-harmonic and is dropped. Every
//!    difference that is a multiple of `1.2` is also a multiple of `0.6`, so the
//!    smaller value only ties because the larger one fits.

use crate::domain::GridScore;

/// Per-difference slack used when comparing fit scores.
const TIE_TOLERANCE_PER_DIFFERENCE: f64 = 1e-6;

/// Relative slack when testing `larger / smaller` for an integer ratio.
const HARMONIC_TOLERANCE: f64 = 1e-6;

/// Pick the index of the fundamental candidate in `scores` (grid order).
///
/// Returns `None` only when `scores` is empty.
pub fn select_fundamental(scores: &[GridScore], n_differences: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, s) in scores.iter().enumerate() {
        match best {
            Some(b) if s.score >= scores[b].score => {}
            _ => best = Some(idx),
        }
    }
    let best = best?;

    let cutoff = scores[best].score + TIE_TOLERANCE_PER_DIFFERENCE * n_differences.max(1) as f64;
    let tied: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i].score <= cutoff)
        .collect();

    let fundamental = tied.iter().copied().find(|&i| {
        !tied
            .iter()
            .any(|&j| is_integer_multiple(scores[j].candidate, scores[i].candidate))
    });

    Some(fundamental.unwrap_or(best))
}

/// `true` when `larger == m * smaller` for some integer `m >= 2`.
fn is_integer_multiple(larger: f64, smaller: f64) -> bool {
    if !(smaller > 0.0 && larger > smaller) {
        return false;
    }
    let ratio = larger / smaller;
    let m = ratio.round();
    m >= 2.0 && (ratio - m).abs() <= HARMONIC_TOLERANCE * m
}

use thiserror::Error;

/// Failures of the unit estimator.
///
/// All variants are raised synchronously and never retried; callers decide
/// whether to surface them (the CLI maps them to exit codes via `AppError`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// No difference survived the near-zero filter.
    #[error("insufficient data: no differences at or above the near-zero threshold {threshold}")]
    InsufficientData { threshold: f64 },

    /// The candidate grid is malformed.
    #[error("invalid search range: low={low}, high={high}, step={step} (need finite 0 < low < high and step > 0)")]
    InvalidRange { low: f64, high: f64, step: f64 },

    /// Non-finite numbers or an unusable threshold.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default lower bound of the candidate unit grid.
pub const DEFAULT_SEARCH_LOW: f64 = 0.5;
/// Default upper bound of the candidate unit grid (inclusive).
pub const DEFAULT_SEARCH_HIGH: f64 = 3.0;
/// Default candidate spacing.
pub const DEFAULT_SEARCH_STEP: f64 = 0.1;
/// Differences below this value are treated as duplicate (zero-step) drops.
pub const DEFAULT_ZERO_THRESHOLD: f64 = 0.1;

/// Grid-search configuration for the unit estimator.
///
/// The grid is the closed range `[search_low, search_high]` sampled every
/// `search_step`. `zero_threshold` controls which differences are discarded
/// before scoring; it should sit well below the smallest unit you expect to
/// recover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub search_low: f64,
    pub search_high: f64,
    pub search_step: f64,
    pub zero_threshold: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            search_low: DEFAULT_SEARCH_LOW,
            search_high: DEFAULT_SEARCH_HIGH,
            search_step: DEFAULT_SEARCH_STEP,
            zero_threshold: DEFAULT_ZERO_THRESHOLD,
        }
    }
}

/// Result of a unit estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitEstimate {
    /// The winning grid candidate, rounded to the grid's decimal resolution.
    pub unit: f64,
    /// Fit score at `unit` (0 means every difference is an exact multiple).
    pub score: f64,
    /// Number of grid points evaluated.
    pub candidates_probed: usize,
    /// Number of differences that survived the near-zero filter.
    pub differences_used: usize,
}

/// Score of a single probed grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridScore {
    pub candidate: f64,
    pub score: f64,
}

/// Synthetic sample settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Mass of a drop carrying no charge.
    pub base_mass: f64,
    /// The fundamental unit the experimenter tries to discover.
    pub true_unit: f64,
    pub drop_count: usize,
    /// Inclusive range of electrons picked up per drop.
    pub electrons_min: u32,
    pub electrons_max: u32,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            base_mass: 6.5,
            true_unit: 1.2,
            drop_count: 50,
            electrons_min: 1,
            electrons_max: 20,
            seed: 42,
        }
    }
}

/// A single simulated oil drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilDrop {
    pub id: String,
    pub mass: f64,
    /// Ground truth, hidden from the estimator.
    pub electrons: u32,
}

/// Derived views of a sample used by reports and charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Masses sorted ascending.
    pub sorted_masses: Vec<f64>,
    pub lightest: f64,
    /// Mass above the lightest drop, per sorted drop (zeros kept).
    pub differences: Vec<f64>,
    /// Gaps between consecutive sorted masses above the near-zero threshold.
    pub step_sizes: Vec<f64>,
}

/// Electron-count vs mass check of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    /// Least-squares slope of mass over electron count (should match the unit).
    pub slope: f64,
    /// Least-squares intercept (should match the base mass).
    pub intercept: f64,
    pub rmse: f64,
    /// Electrons above the lightest drop implied by the estimated unit,
    /// one entry per sorted drop.
    pub inferred_electrons: Vec<u32>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sample: SampleConfig,
    pub estimator: EstimatorConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub histogram_bins: usize,
    pub questions: bool,

    pub export_csv: Option<PathBuf>,
    pub export_run: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            estimator: EstimatorConfig::default(),
            plot: true,
            plot_width: 72,
            plot_height: 16,
            histogram_bins: 20,
            questions: false,
            export_csv: None,
            export_run: None,
        }
    }
}

/// A saved run file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFile {
    pub tool: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub sample: SampleConfig,
    pub estimator: EstimatorConfig,
    pub drops: Vec<OilDrop>,
    pub estimate: UnitEstimate,
    pub verification: Verification,
}

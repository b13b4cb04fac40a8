//! Export per-drop results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Rows follow the sorted (lightest first) order used by the analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::error::{AppError, EXIT_USAGE};

/// Write per-drop results to a CSV file.
pub fn write_drops_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "id,mass,electrons,mass_above_min,inferred_electrons")
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to write export CSV header: {e}")))?;

    let mut drops: Vec<_> = run.sample.drops.iter().collect();
    drops.sort_by(|a, b| a.mass.total_cmp(&b.mass));

    let rows = drops
        .iter()
        .zip(&run.analysis.differences)
        .zip(&run.verification.inferred_electrons);
    for ((drop, diff), inferred) in rows {
        writeln!(
            file,
            "{},{:.6},{},{:.6},{}",
            drop.id, drop.mass, drop.electrons, diff, inferred
        )
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to write export CSV row: {e}")))?;
    }

    log::info!("wrote {} drop rows to {}", drops.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_simulation;
    use crate::domain::{EstimatorConfig, SampleConfig};

    #[test]
    fn csv_has_one_sorted_row_per_drop() {
        let sample = SampleConfig {
            drop_count: 8,
            ..SampleConfig::default()
        };
        let run = run_simulation(&sample, &EstimatorConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drops.csv");
        write_drops_csv(&path, &run).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,mass,electrons,mass_above_min,inferred_electrons");
        assert_eq!(lines.len(), 9);

        let masses: Vec<f64> = lines[1..]
            .iter()
            .map(|l| l.split(',').nth(1).unwrap().parse().unwrap())
            .collect();
        assert!(masses.windows(2).all(|w| w[0] <= w[1]));
        assert!(lines[1].ends_with(",0.000000,0"));
    }
}

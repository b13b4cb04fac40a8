//! Read/write run JSON files.
//!
//! A run file is the "portable" representation of a simulation:
//! - sample and estimator configuration
//! - the generated drops (including their hidden electron counts)
//! - the estimate and verification results
//!
//! `oildrop plot --run <file>` re-analyzes the drops and redraws the charts.
//! The schema is defined by `domain::RunFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::RunFile;
use crate::error::{AppError, EXIT_USAGE};

/// Write a run JSON file.
pub fn write_run_json(path: &Path, run: &RunFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to create run JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, run)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to write run JSON: {e}")))?;

    log::info!("wrote run file {}", path.display());
    Ok(())
}

/// Read a run JSON file.
pub fn read_run_json(path: &Path) -> Result<RunFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to open run JSON '{}': {e}", path.display())))?;
    let run: RunFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid run JSON: {e}")))?;
    Ok(run)
}

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - estimator configuration and outputs (`EstimatorConfig`, `UnitEstimate`, `GridScore`)
//! - simulated observations (`SampleConfig`, `OilDrop`)
//! - derived analysis views (`Analysis`, `Verification`)
//! - run configuration and the exported run file (`RunConfig`, `RunFile`)

pub mod types;

pub use types::*;

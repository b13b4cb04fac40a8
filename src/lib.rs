//! `oildrop` library crate.
//!
//! A classroom simulation of the Millikan oil-drop experiment: synthetic drop
//! masses are generated, the fundamental unit is recovered from their
//! differences by grid search, and the result is reported and charted.
//!
//! The binary (`oildrop`) is a thin wrapper around this library so that:
//!
//! - the estimator is testable without spawning processes or drawing charts
//! - modules are reusable (e.g., notebooks, other front-ends)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;

//! Unit estimation.
//!
//! Responsibilities:
//!
//! - generate the candidate grid
//! - score each candidate against the observed differences
//! - select the fundamental unit (ties + sub-harmonics)

pub mod error;
pub mod estimator;
pub mod grid;
pub mod selection;

pub use error::*;
pub use estimator::*;
pub use grid::*;
pub use selection::*;

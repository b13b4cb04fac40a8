//! Input data sources.
//!
//! - synthetic oil-drop samples (`sample`)

pub mod sample;

pub use sample::*;

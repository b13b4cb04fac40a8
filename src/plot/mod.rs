//! Chart rendering.
//!
//! - deterministic ASCII charts for terminal output (`ascii`)
//! - series/bounds preparation shared with the TUI (`series`)

pub mod ascii;
pub mod series;

pub use ascii::*;

//! Collection module.
//!
//! This module provides:
//! - Assignment folder discovery
//! - The collector that copies and renames submissions
//! - Run statistics

pub mod collector;
pub mod discovery;
pub mod stats;

pub use collector::{CollectOptions, Collector};
pub use discovery::discover_assignments;
pub use stats::CollectStats;

//! Output module for reporting on harvested data
//!
//! This module handles the read-only side of the output tree:
//! - Tallying total and distinct tracks per show and overall
//! - Printing the tallies for operators

pub mod stats;

pub use stats::{load_statistics, print_statistics, HarvestStatistics, ShowStatistics};

//! CLI command implementations

pub mod config;
pub mod dashboard;
pub mod ideas;
pub mod opportunity_cost;
pub mod principles;
pub mod sample_size;
pub mod segments;
pub mod significance;

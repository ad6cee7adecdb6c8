//! Statistical calculators and portfolio aggregation for A/B test planning.
//!
//! The calculators are pure functions over plain input structs: sizing a test
//! before it starts, judging significance once results are in, and pricing the
//! cost of leaving a test idea on the shelf. [`aggregators`] rolls a whole
//! backlog up into one dashboard summary.

pub mod aggregators;
pub mod calculators;
pub mod error;
pub mod statistical;

pub use aggregators::*;
pub use calculators::*;
pub use error::*;
pub use statistical::*;

pub mod opportunity_cost;
pub mod sample_size;
pub mod significance;

pub use opportunity_cost::*;
pub use sample_size::*;
pub use significance::*;

pub mod idea;
pub mod ids;
pub mod principle;
pub mod segment;

pub use idea::*;
pub use ids::*;
pub use principle::*;
pub use segment::*;

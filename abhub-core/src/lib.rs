pub mod backlog;
pub mod domain;
pub mod error;

pub use backlog::*;
pub use domain::*;
pub use error::*;

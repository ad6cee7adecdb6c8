use thiserror::Error;

/// Errors produced by the statistical calculators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Input fails a precondition (out of range, zero where positive is
    /// required, conversions exceeding visitors).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input is formally valid but the statistic it asks for does not
    /// exist (zero effect size, zero standard error, zero control rate).
    #[error("Degenerate computation: {0}")]
    Degenerate(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        StatsError::InvalidInput(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        StatsError::Degenerate(msg.into())
    }
}

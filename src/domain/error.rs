//! Domain error types.
//!
//! Only hard input-validity failures surface as errors. Series that are
//! merely too short for an indicator's window degrade to the indicator's
//! documented neutral value and never error.

/// Top-level error type for stocklens.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("invalid bar at index {index}: high {high} below low {low}")]
    InvalidBar { index: usize, high: f64, low: f64 },

    #[error("transaction {index} for {symbol}: {reason}")]
    InvalidTransaction {
        symbol: String,
        index: usize,
        reason: String,
    },

    #[error("sell of {shares} shares exceeds open lots for {symbol}")]
    Oversell { symbol: String, shares: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

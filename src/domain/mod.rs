//! Core domain types and computation.

pub mod analysis;
pub mod currency;
pub mod error;
pub mod indicator;
pub mod ledger;
pub mod levels;
pub mod ohlcv;
pub mod synthesis;

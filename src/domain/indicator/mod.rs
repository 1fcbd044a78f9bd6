//! Technical indicator implementations.
//!
//! Every function is pure and deterministic. Two failure tiers apply
//! throughout: a series shorter than an indicator's window degrades to the
//! indicator's documented neutral value (RSI → 50, MACD → zeros, Williams
//! %R → -50, …); malformed mandatory input is rejected upstream by
//! [`crate::domain::ohlcv::validate_series`].

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ichimoku;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;
pub mod volume;
pub mod williams;

pub use adx::{adx, AdxOutput};
pub use atr::atr;
pub use bollinger::{bandwidth_series, bollinger, is_squeeze, BollingerOutput};
pub use cci::cci;
pub use ichimoku::{cloud_position, ichimoku, CloudPosition, IchimokuOutput};
pub use macd::{macd, macd_crossover, macd_divergence, macd_series, MacdOutput};
pub use moving_average::{ema, ema_series, sma, wilder};
pub use rsi::{rsi, rsi_divergence, rsi_series};
pub use stochastic::{stochastic, stochastic_k_series, StochasticOutput};
pub use volume::{obv, obv_series, vwap};
pub use williams::williams_r;

/// Highest value in a slice.
pub(crate) fn highest(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest value in a slice.
pub(crate) fn lowest(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Population standard deviation (divides by N, not N-1).
pub(crate) fn stddev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let variance = data
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    variance.sqrt()
}

//! Williams %R.

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

/// %R = (highest_high - close) / (highest_high - lowest_low) × -100,
/// bounded in [-100, 0]. -50 on zero range or insufficient data.
pub fn williams_r(bars: &[OhlcvBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return -50.0;
    }
    let window = &bars[bars.len() - period..];
    let high = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range = high - low;
    if range == 0.0 {
        return -50.0;
    }
    (high - bars[bars.len() - 1].close) / range * -100.0
}

//! Bollinger Bands.
//!
//! Middle = SMA(period), upper/lower = middle ± mult × population stddev.
//! Bandwidth = (upper - lower) / middle × 100. %B = (close - lower) /
//! (upper - lower), 0.5 when the band has zero width. A squeeze is flagged
//! when the current bandwidth sits within 1.1× of the narrowest bandwidth
//! over the trailing 120 periods.

use super::moving_average::sma;
use super::stddev;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

const SQUEEZE_LOOKBACK: usize = 120;
const SQUEEZE_RATIO: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
    pub percent_b: f64,
}

/// Bands at the latest close. With fewer than `period` closes the middle
/// degrades to the SMA fallback (last value) with collapsed bands.
pub fn bollinger(closes: &[f64], period: usize, mult: f64) -> BollingerOutput {
    if closes.is_empty() || period == 0 {
        return BollingerOutput {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            bandwidth: 0.0,
            percent_b: 0.5,
        };
    }
    let middle = sma(closes, period);
    let sd = if closes.len() < period {
        0.0
    } else {
        stddev(&closes[closes.len() - period..])
    };
    let upper = middle + mult * sd;
    let lower = middle - mult * sd;

    let bandwidth = if middle != 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };
    let width = upper - lower;
    let close = closes[closes.len() - 1];
    let percent_b = if width != 0.0 {
        (close - lower) / width
    } else {
        0.5
    };

    BollingerOutput {
        upper,
        middle,
        lower,
        bandwidth,
        percent_b,
    }
}

/// Bandwidth recomputed at each series endpoint; positions with fewer than
/// `period` closes carry 0.0.
pub fn bandwidth_series(closes: &[f64], period: usize, mult: f64) -> Vec<f64> {
    (0..closes.len())
        .map(|i| {
            if i + 1 < period {
                0.0
            } else {
                bollinger(&closes[..=i], period, mult).bandwidth
            }
        })
        .collect()
}

/// Squeeze check: current bandwidth within [`SQUEEZE_RATIO`]× of the
/// trailing-window minimum.
pub fn is_squeeze(closes: &[f64], period: usize, mult: f64) -> bool {
    if closes.len() < period {
        return false;
    }
    let series = bandwidth_series(closes, period, mult);
    let start = series.len().saturating_sub(SQUEEZE_LOOKBACK);
    let window: Vec<f64> = series[start..].iter().copied().filter(|&b| b > 0.0).collect();
    if window.is_empty() {
        return false;
    }
    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    let current = series[series.len() - 1];
    current > 0.0 && current <= min * SQUEEZE_RATIO
}

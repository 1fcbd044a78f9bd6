//! MACD (Moving Average Convergence Divergence).
//!
//! MACD = EMA(fast) - EMA(slow), Signal = EMA(MACD series, signal period),
//! Histogram = MACD - Signal. The full aligned series is produced because
//! crossover and divergence detection need previous-bar values; with fewer
//! than slow+signal closes everything degrades to zeros.

use crate::domain::analysis::{Divergence, Signal};

use super::moving_average::ema_series;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

const DIVERGENCE_LOOKBACK: usize = 20;
const DIVERGENCE_SKIP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Latest MACD values at default parameters. Zeros with fewer than
/// slow + signal closes.
pub fn macd(closes: &[f64]) -> MacdOutput {
    if closes.len() < DEFAULT_SLOW + DEFAULT_SIGNAL {
        return MacdOutput::default();
    }
    match macd_series(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL).last() {
        Some(&v) => v,
        None => MacdOutput::default(),
    }
}

/// Full aligned MACD series, one streaming pass per EMA. Element i is the
/// MACD state as of bar i, so truncating the input by one bar and
/// recomputing reproduces element i-1 exactly.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdOutput> {
    if closes.is_empty() || fast == 0 || slow == 0 || signal == 0 {
        return Vec::new();
    }
    let ema_fast = ema_series(closes, fast);
    let ema_slow = ema_series(closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&macd_line, signal);

    macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&m, &s)| MacdOutput {
            macd: m,
            signal: s,
            histogram: m - s,
        })
        .collect()
}

/// Crossover at the latest bar: the histogram changing sign against the
/// immediately preceding bar.
pub fn macd_crossover(closes: &[f64]) -> Signal {
    if closes.len() < DEFAULT_SLOW + DEFAULT_SIGNAL + 1 {
        return Signal::Neutral;
    }
    let series = macd_series(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
    let current = series[series.len() - 1].histogram;
    let previous = series[series.len() - 2].histogram;
    if previous <= 0.0 && current > 0.0 {
        Signal::Bullish
    } else if previous >= 0.0 && current < 0.0 {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

/// Price/MACD-line divergence at the latest bar, same window slicing as
/// the RSI heuristic but without the oscillator-zone gates.
pub fn macd_divergence(closes: &[f64]) -> Divergence {
    if closes.len() < DEFAULT_SLOW + DEFAULT_SIGNAL + DIVERGENCE_LOOKBACK + DIVERGENCE_SKIP {
        return Divergence::None;
    }
    let series = macd_series(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
    let end = closes.len() - DIVERGENCE_SKIP;
    let start = end - DIVERGENCE_LOOKBACK;

    let price_low = closes[start..end]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let price_high = closes[start..end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let macd_low = series[start..end]
        .iter()
        .map(|m| m.macd)
        .fold(f64::INFINITY, f64::min);
    let macd_high = series[start..end]
        .iter()
        .map(|m| m.macd)
        .fold(f64::NEG_INFINITY, f64::max);

    let current_price = closes[closes.len() - 1];
    let current_macd = series[series.len() - 1].macd;

    if current_price < price_low && current_macd > macd_low {
        Divergence::Bullish
    } else if current_price > price_high && current_macd < macd_high {
        Divergence::Bearish
    } else {
        Divergence::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.35).sin() * 8.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn macd_insufficient_data_is_zeros() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = macd(&closes);
        assert!((out.macd - 0.0).abs() < f64::EPSILON);
        assert!((out.signal - 0.0).abs() < f64::EPSILON);
        assert!((out.histogram - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let closes = wavy(80);
        for out in macd_series(&closes, 12, 26, 9) {
            assert!((out.histogram - (out.macd - out.signal)).abs() < 1e-9);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = macd(&closes);
        assert!(out.macd > 0.0, "fast EMA should lead in an uptrend");
    }

    #[test]
    fn series_matches_truncated_recompute() {
        let closes = wavy(70);
        let series = macd_series(&closes, 12, 26, 9);
        let truncated = macd_series(&closes[..closes.len() - 1], 12, 26, 9);
        let prev = series[series.len() - 2];
        let recomputed = truncated[truncated.len() - 1];
        assert!((prev.macd - recomputed.macd).abs() < 1e-12);
        assert!((prev.signal - recomputed.signal).abs() < 1e-12);
        assert!((prev.histogram - recomputed.histogram).abs() < 1e-12);
    }

    #[test]
    fn crossover_detects_turn() {
        // Long decline, then a sharp rally long enough to flip the histogram.
        let mut closes: Vec<f64> = (0..50).map(|i| 150.0 - i as f64).collect();
        let mut found = Signal::Neutral;
        for i in 0..30 {
            closes.push(101.0 + 3.0 * i as f64);
            if macd_crossover(&closes) == Signal::Bullish {
                found = Signal::Bullish;
                break;
            }
        }
        assert_eq!(found, Signal::Bullish);
    }

    #[test]
    fn crossover_neutral_when_short() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(macd_crossover(&closes), Signal::Neutral);
    }
}

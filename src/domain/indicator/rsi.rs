//! RSI (Relative Strength Index), Wilder-smoothed.
//!
//! RSI = 100 - 100/(1 + avg_gain/avg_loss); 100 when avg_loss is zero.
//! Fewer than period+1 closes degrades to the neutral 50.
//!
//! Divergence compares the latest bar against the extremes of the 20 bars
//! preceding the final 5, for price and RSI in parallel. The window and
//! the RSI < 40 / > 60 gates are empirical and kept as-is for behavior
//! parity with the tracker this engine was extracted from.

use crate::domain::analysis::Divergence;

pub const DEFAULT_PERIOD: usize = 14;

const DIVERGENCE_LOOKBACK: usize = 20;
const DIVERGENCE_SKIP: usize = 5;

/// RSI of the latest close. Neutral 50 with fewer than `period + 1` closes.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    match rsi_series(closes, period).last() {
        Some(&v) => v,
        None => 50.0,
    }
}

/// Full RSI series aligned with the input, computed in one streaming pass.
/// Warmup positions (fewer than `period` prior changes) carry the neutral
/// 50, so element i always equals `rsi(&closes[..=i], period)`.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![50.0; closes.len()];
    }
    let mut out = Vec::with_capacity(closes.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for i in 0..closes.len() {
        if i == 0 {
            out.push(50.0);
            continue;
        }
        let change = closes[i] - closes[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i < period {
            gain_sum += gain;
            loss_sum += loss;
            out.push(50.0);
        } else if i == period {
            gain_sum += gain;
            loss_sum += loss;
            avg_gain = gain_sum / period as f64;
            avg_loss = loss_sum / period as f64;
            out.push(rsi_from_averages(avg_gain, avg_loss));
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            out.push(rsi_from_averages(avg_gain, avg_loss));
        }
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Price/RSI divergence at the latest bar.
///
/// Bullish: price prints a new low against the reference window while RSI
/// holds above its window low and sits below 40. Bearish mirrors with
/// highs and RSI above 60.
pub fn rsi_divergence(closes: &[f64], period: usize) -> Divergence {
    if closes.len() < DIVERGENCE_LOOKBACK + DIVERGENCE_SKIP {
        return Divergence::None;
    }
    let rsi_values = rsi_series(closes, period);
    let end = closes.len() - DIVERGENCE_SKIP;
    let start = end - DIVERGENCE_LOOKBACK;

    let window_price = &closes[start..end];
    let window_rsi = &rsi_values[start..end];

    let price_low = window_price.iter().copied().fold(f64::INFINITY, f64::min);
    let price_high = window_price
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let rsi_low = window_rsi.iter().copied().fold(f64::INFINITY, f64::min);
    let rsi_high = window_rsi.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let current_price = closes[closes.len() - 1];
    let current_rsi = rsi_values[rsi_values.len() - 1];

    if current_price < price_low && current_rsi > rsi_low && current_rsi < 40.0 {
        Divergence::Bullish
    } else if current_price > price_high && current_rsi < rsi_high && current_rsi > 60.0 {
        Divergence::Bearish
    } else {
        Divergence::None
    }
}

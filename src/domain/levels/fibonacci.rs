//! Fibonacci retracement and extension levels from the dominant swing.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Strength;
use crate::domain::ohlcv::OhlcvBar;

use super::{LevelKind, PriceLevel};

pub const RETRACEMENT_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
pub const EXTENSION_RATIOS: [f64; 5] = [0.0, 0.382, 0.618, 1.0, 1.618];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibLevels {
    pub swing_high: f64,
    pub swing_low: f64,
    /// Swing-low index precedes swing-high index.
    pub uptrend: bool,
    /// (ratio, price) pairs between the swing extremes.
    pub retracements: Vec<(f64, f64)>,
    /// (ratio, price) pairs projected beyond the swing in trend direction.
    pub extensions: Vec<(f64, f64)>,
}

/// Swing extremes over the trailing `lookback` bars, mapped to retracement
/// and extension prices. `None` when the swing range is degenerate.
pub fn fibonacci(bars: &[OhlcvBar], lookback: usize) -> Option<FibLevels> {
    if bars.is_empty() || lookback == 0 {
        return None;
    }
    let start = bars.len().saturating_sub(lookback);
    let window = &bars[start..];

    let mut high_idx = 0;
    let mut low_idx = 0;
    for (i, bar) in window.iter().enumerate() {
        if bar.high > window[high_idx].high {
            high_idx = i;
        }
        if bar.low < window[low_idx].low {
            low_idx = i;
        }
    }
    let swing_high = window[high_idx].high;
    let swing_low = window[low_idx].low;
    let range = swing_high - swing_low;
    if range <= 0.0 {
        return None;
    }
    let uptrend = low_idx < high_idx;

    let retracements = RETRACEMENT_RATIOS
        .iter()
        .map(|&ratio| {
            let price = if uptrend {
                swing_high - range * ratio
            } else {
                swing_low + range * ratio
            };
            (ratio, price)
        })
        .collect();

    let extensions = EXTENSION_RATIOS
        .iter()
        .map(|&ratio| {
            let price = if uptrend {
                swing_high + range * ratio
            } else {
                swing_low - range * ratio
            };
            (ratio, price)
        })
        .collect();

    Some(FibLevels {
        swing_high,
        swing_low,
        uptrend,
        retracements,
        extensions,
    })
}

/// Retracement and extension prices as consolidation candidates. The
/// classic 38.2/50/61.8 retracement ratios carry moderate strength, the
/// rest weak; extensions are weak throughout. The 0.0 extension repeats
/// the swing extreme already covered by the 0.0 retracement, so it is
/// skipped.
pub fn fib_candidates(fib: &FibLevels, current_price: f64) -> Vec<PriceLevel> {
    let classify = |price: f64| {
        if price < current_price {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        }
    };

    let mut out: Vec<PriceLevel> = fib
        .retracements
        .iter()
        .filter(|&&(_, price)| price > 0.0 && price != current_price)
        .map(|&(ratio, price)| {
            let strength = if (0.382..=0.618).contains(&ratio) {
                Strength::Moderate
            } else {
                Strength::Weak
            };
            PriceLevel::new(price, classify(price), strength, "fibonacci")
        })
        .collect();

    out.extend(
        fib.extensions
            .iter()
            .filter(|&&(ratio, price)| ratio > 0.0 && price > 0.0 && price != current_price)
            .map(|&(_, price)| {
                PriceLevel::new(price, classify(price), Strength::Weak, "fib_extension")
            }),
    );
    out
}

//! Volume indicators: OBV and VWAP.

use crate::domain::ohlcv::OhlcvBar;

/// On-Balance Volume: cumulative signed volume over the series.
pub fn obv(bars: &[OhlcvBar]) -> f64 {
    match obv_series(bars).last() {
        Some(&v) => v,
        None => 0.0,
    }
}

/// Full OBV series. Volume is added on up-close bars, subtracted on
/// down-close bars, unchanged on flat closes.
pub fn obv_series(bars: &[OhlcvBar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev_close = bars[i - 1].close;
            if bar.close > prev_close {
                running += bar.volume;
            } else if bar.close < prev_close {
                running -= bar.volume;
            }
        }
        out.push(running);
    }
    out
}

/// Volume-weighted average of typical price. 0.0 when the series carries
/// no volume.
pub fn vwap(bars: &[OhlcvBar]) -> f64 {
    let total_volume: f64 = bars.iter().map(|b| b.volume).sum();
    if total_volume == 0.0 {
        return 0.0;
    }
    let weighted: f64 = bars.iter().map(|b| b.typical_price() * b.volume).sum();
    weighted / total_volume
}

//! Commodity Channel Index.

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;

const LAMBERT_CONSTANT: f64 = 0.015;

/// CCI = (typical - SMA(typical, period)) / (0.015 × mean absolute
/// deviation). 0.0 when the deviation is zero or data is insufficient.
pub fn cci(bars: &[OhlcvBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }
    let typicals: Vec<f64> = bars[bars.len() - period..]
        .iter()
        .map(|b| b.typical_price())
        .collect();
    let mean = typicals.iter().sum::<f64>() / period as f64;
    let mean_deviation = typicals.iter().map(|t| (t - mean).abs()).sum::<f64>() / period as f64;
    if mean_deviation == 0.0 {
        return 0.0;
    }
    let current = typicals[typicals.len() - 1];
    (current - mean) / (LAMBERT_CONSTANT * mean_deviation)
}

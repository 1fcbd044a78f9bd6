//! Moving averages reported as dynamic support/resistance levels.

use crate::domain::analysis::Strength;
use crate::domain::indicator::sma;
use crate::domain::ohlcv::{closes, OhlcvBar};

use super::{LevelKind, PriceLevel};

const MA_PERIODS: [(usize, Strength); 4] = [
    (20, Strength::Weak),
    (50, Strength::Moderate),
    (100, Strength::Moderate),
    (200, Strength::Strong),
];

/// SMA(20/50/100/200) as level candidates; only periods the series can
/// actually cover are reported, and strength grows with the period.
pub fn moving_average_levels(bars: &[OhlcvBar], current_price: f64) -> Vec<PriceLevel> {
    let close_values = closes(bars);
    MA_PERIODS
        .iter()
        .filter(|&&(period, _)| close_values.len() >= period)
        .filter_map(|&(period, strength)| {
            let price = sma(&close_values, period);
            if price <= 0.0 || price == current_price {
                return None;
            }
            let kind = if price < current_price {
                LevelKind::Support
            } else {
                LevelKind::Resistance
            };
            Some(PriceLevel::new(
                price,
                kind,
                strength,
                &format!("sma{period}"),
            ))
        })
        .collect()
}

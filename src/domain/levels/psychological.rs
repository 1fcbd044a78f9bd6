//! Psychological round-number levels near the current price.

use crate::domain::analysis::Strength;

use super::{LevelKind, PriceLevel};

/// Round-number interval scaled to the price magnitude.
pub fn round_interval(price: f64) -> f64 {
    if price >= 1000.0 {
        100.0
    } else if price >= 100.0 {
        10.0
    } else if price >= 10.0 {
        1.0
    } else if price >= 1.0 {
        0.5
    } else {
        0.1
    }
}

/// Round numbers within `band_pct` of the current price, classified by
/// their side. Multiples of ten intervals read moderate, the rest weak.
pub fn psychological_levels(current_price: f64, band_pct: f64) -> Vec<PriceLevel> {
    if current_price <= 0.0 || band_pct <= 0.0 {
        return Vec::new();
    }
    let interval = round_interval(current_price);
    let band = current_price * band_pct / 100.0;
    let low = current_price - band;
    let high = current_price + band;

    let mut out = Vec::new();
    let mut level = (low / interval).ceil() * interval;
    while level <= high {
        if level > 0.0 && level != current_price {
            let kind = if level < current_price {
                LevelKind::Support
            } else {
                LevelKind::Resistance
            };
            let major = (level / (interval * 10.0)).fract().abs() < 1e-9;
            let strength = if major {
                Strength::Moderate
            } else {
                Strength::Weak
            };
            out.push(PriceLevel::new(level, kind, strength, "psychological"));
        }
        level += interval;
    }
    out
}

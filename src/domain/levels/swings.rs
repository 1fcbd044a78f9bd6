//! Swing-point fractals.
//!
//! A bar is a swing high/low when its high/low is strictly more extreme
//! than every bar within `left`/`right` bars on both sides. Strength is
//! the average price distance to the adjacent swings.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Strength;
use crate::domain::ohlcv::OhlcvBar;

use super::{LevelKind, PriceLevel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    pub is_high: bool,
    /// Average distance to the adjacent swing extremes.
    pub strength: f64,
}

pub fn swing_points(bars: &[OhlcvBar], left: usize, right: usize) -> Vec<SwingPoint> {
    let mut swings = Vec::new();
    if bars.len() < left + right + 1 {
        return swings;
    }

    for i in left..bars.len() - right {
        let high = bars[i].high;
        let low = bars[i].low;
        let neighbors = bars[i - left..i].iter().chain(&bars[i + 1..=i + right]);

        let mut is_swing_high = true;
        let mut is_swing_low = true;
        for other in neighbors {
            if other.high >= high {
                is_swing_high = false;
            }
            if other.low <= low {
                is_swing_low = false;
            }
            if !is_swing_high && !is_swing_low {
                break;
            }
        }
        if is_swing_high {
            swings.push(SwingPoint {
                index: i,
                price: high,
                is_high: true,
                strength: 0.0,
            });
        }
        if is_swing_low {
            swings.push(SwingPoint {
                index: i,
                price: low,
                is_high: false,
                strength: 0.0,
            });
        }
    }

    // Strength from the distance to adjacent swings in sequence order.
    for i in 0..swings.len() {
        let prev = i.checked_sub(1).map(|j| (swings[j].price - swings[i].price).abs());
        let next = swings.get(i + 1).map(|s| (s.price - swings[i].price).abs());
        swings[i].strength = match (prev, next) {
            (Some(a), Some(b)) => (a + b) / 2.0,
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => 0.0,
        };
    }
    swings
}

/// Swing prices as consolidation candidates; tier scales with the swing's
/// relative amplitude.
pub fn swing_candidates(
    bars: &[OhlcvBar],
    current_price: f64,
    left: usize,
    right: usize,
) -> Vec<PriceLevel> {
    swing_points(bars, left, right)
        .into_iter()
        .filter(|s| s.price != current_price)
        .map(|s| {
            let kind = if s.price < current_price {
                LevelKind::Support
            } else {
                LevelKind::Resistance
            };
            let relative = if current_price > 0.0 {
                s.strength / current_price
            } else {
                0.0
            };
            let strength = if relative >= 0.05 {
                Strength::Strong
            } else if relative >= 0.02 {
                Strength::Moderate
            } else {
                Strength::Weak
            };
            PriceLevel::new(s.price, kind, strength, "swing")
        })
        .collect()
}

//! Price clustering: greedy single-pass grouping of highs, lows and
//! wide-candle midpoints into touch-counted levels.

use crate::domain::analysis::Strength;
use crate::domain::ohlcv::OhlcvBar;

use super::{LevelKind, PriceLevel};

const WIDE_CANDLE_RATIO: f64 = 1.5;

struct Cluster {
    sum: f64,
    count: u32,
}

impl Cluster {
    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Cluster highs/lows (plus midpoints of abnormally wide candles) within
/// `tolerance_pct` of current price; keep clusters with at least
/// `min_touches` members. Tiers: ≥8 touches strong, ≥5 moderate, else weak.
pub fn cluster_levels(
    bars: &[OhlcvBar],
    current_price: f64,
    tolerance_pct: f64,
    min_touches: u32,
) -> Vec<PriceLevel> {
    if bars.is_empty() || current_price <= 0.0 {
        return Vec::new();
    }
    let tolerance = current_price * tolerance_pct / 100.0;
    if tolerance <= 0.0 {
        return Vec::new();
    }

    let avg_range =
        bars.iter().map(|b| b.high - b.low).sum::<f64>() / bars.len() as f64;

    let mut points = Vec::with_capacity(bars.len() * 2);
    for bar in bars {
        points.push(bar.high);
        points.push(bar.low);
        if avg_range > 0.0 && bar.high - bar.low > avg_range * WIDE_CANDLE_RATIO {
            points.push((bar.high + bar.low) / 2.0);
        }
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for price in points {
        match clusters
            .iter_mut()
            .find(|c| (c.mean() - price).abs() <= tolerance)
        {
            Some(cluster) => {
                cluster.sum += price;
                cluster.count += 1;
            }
            None => clusters.push(Cluster {
                sum: price,
                count: 1,
            }),
        }
    }

    clusters
        .into_iter()
        .filter(|c| c.count >= min_touches)
        .filter(|c| c.mean() != current_price)
        .map(|c| {
            let price = c.mean();
            let kind = if price < current_price {
                LevelKind::Support
            } else {
                LevelKind::Resistance
            };
            let strength = if c.count >= 8 {
                Strength::Strong
            } else if c.count >= 5 {
                Strength::Moderate
            } else {
                Strength::Weak
            };
            let mut level = PriceLevel::new(price, kind, strength, "cluster");
            level.touches = c.count;
            level
        })
        .collect()
}

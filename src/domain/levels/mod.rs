//! Support/resistance detection and consolidation.
//!
//! Seven independent detectors (pivots, Fibonacci, volume profile, swing
//! fractals, price clustering, psychological rounds, moving averages)
//! produce candidate levels; [`consolidate::consolidate`] merges, scores
//! and ranks them into the bounded map handed to the synthesizer.

pub mod clusters;
pub mod consolidate;
pub mod fibonacci;
pub mod ma_levels;
pub mod pivots;
pub mod psychological;
pub mod swings;
pub mod volume_profile;

use serde::{Deserialize, Serialize};

use super::analysis::Strength;
use super::ohlcv::OhlcvBar;

pub use fibonacci::{fibonacci, FibLevels};
pub use pivots::{pivots, PivotLevels, PivotMethod};
pub use swings::{swing_points, SwingPoint};
pub use volume_profile::{volume_profile, VolumeProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A candidate or consolidated price level. Transient output — never
/// persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub kind: LevelKind,
    pub strength: Strength,
    /// Detector label; consolidation joins merged labels with '+'.
    pub source: String,
    pub touches: u32,
}

impl PriceLevel {
    pub fn new(price: f64, kind: LevelKind, strength: Strength, source: &str) -> Self {
        PriceLevel {
            price,
            kind,
            strength,
            source: source.to_string(),
            touches: 1,
        }
    }
}

/// Tuning knobs for the detectors and the consolidation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Swing lookback for Fibonacci retracement.
    pub fib_lookback: usize,
    /// Cluster tolerance as a percentage of current price.
    pub cluster_tolerance_pct: f64,
    /// Merge tolerance between candidates, percent.
    pub consolidation_tolerance_pct: f64,
    /// Band around current price for psychological rounds, percent.
    pub psych_band_pct: f64,
    pub volume_bins: usize,
    pub swing_left: usize,
    pub swing_right: usize,
    pub min_touches: u32,
    /// Combined cap; each side keeps at most half.
    pub max_levels: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            fib_lookback: 50,
            cluster_tolerance_pct: 1.5,
            consolidation_tolerance_pct: 1.0,
            psych_band_pct: 5.0,
            volume_bins: 50,
            swing_left: 3,
            swing_right: 3,
            min_touches: 3,
            max_levels: 10,
        }
    }
}

/// Consolidated map, each side sorted ascending by price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelMap {
    pub supports: Vec<PriceLevel>,
    pub resistances: Vec<PriceLevel>,
}

impl LevelMap {
    /// Nearest support strictly below the given price.
    pub fn nearest_support(&self, price: f64) -> Option<&PriceLevel> {
        self.supports
            .iter()
            .filter(|l| l.price < price)
            .max_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Nearest resistance strictly above the given price.
    pub fn nearest_resistance(&self, price: f64) -> Option<&PriceLevel> {
        self.resistances
            .iter()
            .filter(|l| l.price > price)
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

/// Run every detector and consolidate the candidates.
pub fn detect_levels(bars: &[OhlcvBar], current_price: f64, config: &LevelConfig) -> LevelMap {
    let mut candidates: Vec<PriceLevel> = Vec::new();

    if let Some(last) = bars.last() {
        candidates.extend(pivots::pivot_candidates(last, current_price));
    }
    if let Some(fib) = fibonacci(bars, config.fib_lookback) {
        candidates.extend(fibonacci::fib_candidates(&fib, current_price));
    }
    if let Some(profile) = volume_profile(bars, config.volume_bins) {
        candidates.extend(volume_profile::profile_candidates(&profile, current_price));
    }
    candidates.extend(swings::swing_candidates(
        bars,
        current_price,
        config.swing_left,
        config.swing_right,
    ));
    candidates.extend(clusters::cluster_levels(
        bars,
        current_price,
        config.cluster_tolerance_pct,
        config.min_touches,
    ));
    candidates.extend(psychological::psychological_levels(
        current_price,
        config.psych_band_pct,
    ));
    candidates.extend(ma_levels::moving_average_levels(bars, current_price));

    consolidate::consolidate(candidates, current_price, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar::new(close, high, low, close, 10_000.0)
    }

    fn ranging_bars() -> Vec<OhlcvBar> {
        (0..120)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.4).sin() * 8.0;
                make_bar(base + 1.5, base - 1.5, base)
            })
            .collect()
    }

    #[test]
    fn detect_levels_splits_sides_around_price() {
        let map = detect_levels(&ranging_bars(), 100.0, &LevelConfig::default());
        assert!(!map.supports.is_empty());
        assert!(!map.resistances.is_empty());
        for level in &map.supports {
            assert!(level.price < 100.0);
        }
        for level in &map.resistances {
            assert!(level.price > 100.0);
        }
    }

    #[test]
    fn detect_levels_respects_cap() {
        let config = LevelConfig::default();
        let map = detect_levels(&ranging_bars(), 100.0, &config);
        assert!(map.supports.len() <= config.max_levels / 2);
        assert!(map.resistances.len() <= config.max_levels / 2);
    }

    #[test]
    fn sides_sorted_ascending() {
        let map = detect_levels(&ranging_bars(), 100.0, &LevelConfig::default());
        for side in [&map.supports, &map.resistances] {
            for pair in side.windows(2) {
                assert!(pair[0].price <= pair[1].price);
            }
        }
    }

    #[test]
    fn nearest_lookup() {
        let map = LevelMap {
            supports: vec![
                PriceLevel::new(90.0, LevelKind::Support, Strength::Weak, "test"),
                PriceLevel::new(95.0, LevelKind::Support, Strength::Weak, "test"),
            ],
            resistances: vec![
                PriceLevel::new(105.0, LevelKind::Resistance, Strength::Weak, "test"),
                PriceLevel::new(110.0, LevelKind::Resistance, Strength::Weak, "test"),
            ],
        };
        assert!((map.nearest_support(100.0).unwrap().price - 95.0).abs() < f64::EPSILON);
        assert!((map.nearest_resistance(100.0).unwrap().price - 105.0).abs() < f64::EPSILON);
        assert!(map.nearest_support(80.0).is_none());
    }
}

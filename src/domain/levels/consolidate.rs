//! Merge, score and rank candidate levels into the final bounded map.
//!
//! Candidates within the tolerance band merge into one level: higher
//! strength wins, touch counts add, source labels concatenate, prices
//! average. Survivors are scored
//! `strength×30 + min(touches×5, 25) + max(0, 20 − proximity×100) + sources×10`
//! and the top half of the cap is kept on each side of the current price.

use super::{LevelConfig, LevelKind, LevelMap, PriceLevel};

const SCORE_STRENGTH_WEIGHT: f64 = 30.0;
const SCORE_TOUCH_WEIGHT: f64 = 5.0;
const SCORE_TOUCH_CAP: f64 = 25.0;
const SCORE_PROXIMITY_BASE: f64 = 20.0;
const SCORE_SOURCE_WEIGHT: f64 = 10.0;

pub fn consolidate(
    mut candidates: Vec<PriceLevel>,
    current_price: f64,
    config: &LevelConfig,
) -> LevelMap {
    if candidates.is_empty() || current_price <= 0.0 {
        return LevelMap::default();
    }
    candidates.sort_by(|a, b| a.price.total_cmp(&b.price));

    let tolerance_ratio = config.consolidation_tolerance_pct / 100.0;
    let mut merged: Vec<PriceLevel> = Vec::new();

    for candidate in candidates {
        match merged.last_mut() {
            Some(last) if within_tolerance(last.price, candidate.price, tolerance_ratio) => {
                let total = last.touches + candidate.touches;
                last.price = (last.price * last.touches as f64
                    + candidate.price * candidate.touches as f64)
                    / total as f64;
                last.touches = total;
                last.strength = last.strength.max(candidate.strength);
                if !last.source.split('+').any(|s| s == candidate.source) {
                    last.source.push('+');
                    last.source.push_str(&candidate.source);
                }
            }
            _ => merged.push(candidate),
        }
    }

    merged.sort_by(|a, b| {
        score(b, current_price)
            .partial_cmp(&score(a, current_price))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let per_side = config.max_levels / 2;
    let mut supports = Vec::new();
    let mut resistances = Vec::new();
    for mut level in merged {
        if level.price < current_price && supports.len() < per_side {
            level.kind = LevelKind::Support;
            supports.push(level);
        } else if level.price > current_price && resistances.len() < per_side {
            level.kind = LevelKind::Resistance;
            resistances.push(level);
        }
    }
    supports.sort_by(|a, b| a.price.total_cmp(&b.price));
    resistances.sort_by(|a, b| a.price.total_cmp(&b.price));

    LevelMap {
        supports,
        resistances,
    }
}

fn within_tolerance(a: f64, b: f64, ratio: f64) -> bool {
    let reference = a.abs().max(f64::MIN_POSITIVE);
    (a - b).abs() / reference <= ratio
}

/// Ranking score for a merged level.
pub fn score(level: &PriceLevel, current_price: f64) -> f64 {
    let proximity = (level.price - current_price).abs() / current_price;
    let source_count = level.source.split('+').count() as f64;
    level.strength.rank() as f64 * SCORE_STRENGTH_WEIGHT
        + (level.touches as f64 * SCORE_TOUCH_WEIGHT).min(SCORE_TOUCH_CAP)
        + (SCORE_PROXIMITY_BASE - proximity * 100.0).max(0.0)
        + source_count * SCORE_SOURCE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::Strength;

    fn level(price: f64, strength: Strength, source: &str, touches: u32) -> PriceLevel {
        let kind = if price < 100.0 {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        };
        let mut l = PriceLevel::new(price, kind, strength, source);
        l.touches = touches;
        l
    }

    #[test]
    fn nearby_candidates_merge() {
        let candidates = vec![
            level(95.0, Strength::Weak, "pivot", 1),
            level(95.3, Strength::Strong, "cluster", 4),
        ];
        let map = consolidate(candidates, 100.0, &LevelConfig::default());
        assert_eq!(map.supports.len(), 1);
        let merged = &map.supports[0];
        assert_eq!(merged.touches, 5);
        assert_eq!(merged.strength, Strength::Strong);
        assert!(merged.source.contains("pivot") && merged.source.contains("cluster"));
        // Touch-weighted average: (95.0*1 + 95.3*4) / 5
        assert!((merged.price - 95.24).abs() < 1e-9);
    }

    #[test]
    fn distant_candidates_stay_separate() {
        let candidates = vec![
            level(90.0, Strength::Weak, "pivot", 1),
            level(95.0, Strength::Weak, "swing", 1),
        ];
        let map = consolidate(candidates, 100.0, &LevelConfig::default());
        assert_eq!(map.supports.len(), 2);
    }

    #[test]
    fn duplicate_source_not_repeated() {
        let candidates = vec![
            level(95.0, Strength::Weak, "cluster", 2),
            level(95.1, Strength::Weak, "cluster", 2),
        ];
        let map = consolidate(candidates, 100.0, &LevelConfig::default());
        assert_eq!(map.supports[0].source, "cluster");
    }

    #[test]
    fn cap_keeps_best_scored() {
        let mut candidates = Vec::new();
        for i in 0..20 {
            candidates.push(level(50.0 + i as f64 * 2.0, Strength::Weak, "swing", 1));
        }
        // One strong, heavily-touched level close to price must survive.
        candidates.push(level(98.0, Strength::Strong, "volume_poc", 9));
        let config = LevelConfig::default();
        let map = consolidate(candidates, 100.0, &config);
        assert!(map.supports.len() <= config.max_levels / 2);
        assert!(map.supports.iter().any(|l| (l.price - 98.0).abs() < 0.5));
    }

    #[test]
    fn score_rewards_proximity_and_sources() {
        let near = level(99.0, Strength::Weak, "pivot+cluster", 1);
        let far = level(60.0, Strength::Weak, "pivot", 1);
        assert!(score(&near, 100.0) > score(&far, 100.0));
    }

    #[test]
    fn empty_candidates_empty_map() {
        let map = consolidate(Vec::new(), 100.0, &LevelConfig::default());
        assert!(map.supports.is_empty() && map.resistances.is_empty());
    }
}

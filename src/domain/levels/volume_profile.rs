//! Volume profile: histogram of traded volume across the price range.
//!
//! Each bar's volume is split proportionally over the buckets its high-low
//! range spans. Point of Control is the heaviest bucket; High/Low Volume
//! Nodes sit at ≥1.5× / <0.5× the mean bucket volume.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Strength;
use crate::domain::ohlcv::OhlcvBar;

use super::{LevelKind, PriceLevel};

const HVN_RATIO: f64 = 1.5;
const LVN_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// Point of Control — bucket midpoint with the most volume.
    pub poc: f64,
    pub high_volume_nodes: Vec<f64>,
    pub low_volume_nodes: Vec<f64>,
    pub bucket_volumes: Vec<f64>,
    pub bucket_size: f64,
    pub range_low: f64,
}

/// `None` when the series carries no volume or no price range.
pub fn volume_profile(bars: &[OhlcvBar], bins: usize) -> Option<VolumeProfile> {
    if bars.is_empty() || bins == 0 {
        return None;
    }
    let total_volume: f64 = bars.iter().map(|b| b.volume).sum();
    if total_volume == 0.0 {
        return None;
    }
    let range_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range_high = bars
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = range_high - range_low;
    if span <= 0.0 {
        return None;
    }
    let bucket_size = span / bins as f64;

    let mut bucket_volumes = vec![0.0; bins];
    for bar in bars {
        let bar_span = bar.high - bar.low;
        if bar_span == 0.0 {
            let idx = bucket_index(bar.close, range_low, bucket_size, bins);
            bucket_volumes[idx] += bar.volume;
            continue;
        }
        // Proportional split across every bucket the candle covers.
        let first = bucket_index(bar.low, range_low, bucket_size, bins);
        let last = bucket_index(bar.high, range_low, bucket_size, bins);
        for idx in first..=last {
            let bucket_low = range_low + idx as f64 * bucket_size;
            let bucket_high = bucket_low + bucket_size;
            let overlap = bar.high.min(bucket_high) - bar.low.max(bucket_low);
            if overlap > 0.0 {
                bucket_volumes[idx] += bar.volume * overlap / bar_span;
            }
        }
    }

    let mean = bucket_volumes.iter().sum::<f64>() / bins as f64;
    let poc_idx = bucket_volumes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)?;

    let midpoint = |idx: usize| range_low + (idx as f64 + 0.5) * bucket_size;

    let mut high_volume_nodes = Vec::new();
    let mut low_volume_nodes = Vec::new();
    for (idx, &vol) in bucket_volumes.iter().enumerate() {
        if vol >= mean * HVN_RATIO {
            high_volume_nodes.push(midpoint(idx));
        } else if vol < mean * LVN_RATIO {
            low_volume_nodes.push(midpoint(idx));
        }
    }

    Some(VolumeProfile {
        poc: midpoint(poc_idx),
        high_volume_nodes,
        low_volume_nodes,
        bucket_volumes,
        bucket_size,
        range_low,
    })
}

fn bucket_index(price: f64, range_low: f64, bucket_size: f64, bins: usize) -> usize {
    let idx = ((price - range_low) / bucket_size) as usize;
    idx.min(bins - 1)
}

/// POC and HVNs as consolidation candidates.
pub fn profile_candidates(profile: &VolumeProfile, current_price: f64) -> Vec<PriceLevel> {
    let classify = |price: f64| {
        if price < current_price {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        }
    };
    let mut out = Vec::new();
    if profile.poc != current_price {
        out.push(PriceLevel::new(
            profile.poc,
            classify(profile.poc),
            Strength::Strong,
            "volume_poc",
        ));
    }
    for &node in &profile.high_volume_nodes {
        if node != current_price && node != profile.poc {
            out.push(PriceLevel::new(
                node,
                classify(node),
                Strength::Moderate,
                "volume_hvn",
            ));
        }
    }
    out
}

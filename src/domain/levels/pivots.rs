//! Pivot-point formulas: Standard, Fibonacci, Camarilla, Woodie, DeMark.
//!
//! Every method yields rungs satisfying s3 < s2 < s1 < pivot < r1 < r2 < r3
//! (for bars with a nonzero range). Camarilla pivots off the prior close —
//! the (H+L+C)/3 variant can invert rungs when the close sits far from the
//! midpoint. DeMark publishes only R1/S1; the outer rungs extend by one
//! bar-range per step.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Strength;
use crate::domain::ohlcv::OhlcvBar;

use super::{LevelKind, PriceLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotMethod {
    Standard,
    Fibonacci,
    Camarilla,
    Woodie,
    DeMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub method: PivotMethod,
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// Pivot rungs from the prior bar's high/low/close (and open for DeMark).
pub fn pivots(bar: &OhlcvBar, method: PivotMethod) -> PivotLevels {
    let (high, low, close, open) = (bar.high, bar.low, bar.close, bar.open);
    let range = high - low;

    match method {
        PivotMethod::Standard => {
            let pivot = (high + low + close) / 3.0;
            PivotLevels {
                method,
                pivot,
                r1: 2.0 * pivot - low,
                r2: pivot + range,
                r3: high + 2.0 * (pivot - low),
                s1: 2.0 * pivot - high,
                s2: pivot - range,
                s3: low - 2.0 * (high - pivot),
            }
        }
        PivotMethod::Fibonacci => {
            let pivot = (high + low + close) / 3.0;
            PivotLevels {
                method,
                pivot,
                r1: pivot + 0.382 * range,
                r2: pivot + 0.618 * range,
                r3: pivot + range,
                s1: pivot - 0.382 * range,
                s2: pivot - 0.618 * range,
                s3: pivot - range,
            }
        }
        PivotMethod::Camarilla => PivotLevels {
            method,
            pivot: close,
            r1: close + 1.1 * range / 12.0,
            r2: close + 1.1 * range / 6.0,
            r3: close + 1.1 * range / 4.0,
            s1: close - 1.1 * range / 12.0,
            s2: close - 1.1 * range / 6.0,
            s3: close - 1.1 * range / 4.0,
        },
        PivotMethod::Woodie => {
            let pivot = (high + low + 2.0 * close) / 4.0;
            PivotLevels {
                method,
                pivot,
                r1: 2.0 * pivot - low,
                r2: pivot + range,
                r3: high + 2.0 * (pivot - low),
                s1: 2.0 * pivot - high,
                s2: pivot - range,
                s3: low - 2.0 * (high - pivot),
            }
        }
        PivotMethod::DeMark => {
            let x = if close < open {
                high + 2.0 * low + close
            } else if close > open {
                2.0 * high + low + close
            } else {
                high + low + 2.0 * close
            };
            let pivot = x / 4.0;
            let r1 = x / 2.0 - low;
            let s1 = x / 2.0 - high;
            PivotLevels {
                method,
                pivot,
                r1,
                r2: r1 + range,
                r3: r1 + 2.0 * range,
                s1,
                s2: s1 - range,
                s3: s1 - 2.0 * range,
            }
        }
    }
}

const ALL_METHODS: [PivotMethod; 5] = [
    PivotMethod::Standard,
    PivotMethod::Fibonacci,
    PivotMethod::Camarilla,
    PivotMethod::Woodie,
    PivotMethod::DeMark,
];

/// Every method's rungs as consolidation candidates, classified against
/// the current price. Methods that land on the same price merge (and gain
/// touches) during consolidation.
pub fn pivot_candidates(last_bar: &OhlcvBar, current_price: f64) -> Vec<PriceLevel> {
    let mut out = Vec::with_capacity(ALL_METHODS.len() * 7);
    for method in ALL_METHODS {
        let p = pivots(last_bar, method);
        let rungs = [
            (p.s3, Strength::Weak),
            (p.s2, Strength::Moderate),
            (p.s1, Strength::Moderate),
            (p.pivot, Strength::Strong),
            (p.r1, Strength::Moderate),
            (p.r2, Strength::Moderate),
            (p.r3, Strength::Weak),
        ];
        out.extend(
            rungs
                .into_iter()
                .filter(|&(price, _)| price > 0.0 && price != current_price)
                .map(|(price, strength)| {
                    let kind = if price < current_price {
                        LevelKind::Support
                    } else {
                        LevelKind::Resistance
                    };
                    PriceLevel::new(price, kind, strength, "pivot")
                }),
        );
    }
    out
}

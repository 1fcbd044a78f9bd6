//! ADX (Average Directional Index) with the ±DI lines.
//!
//! Directional movement from consecutive high/low deltas, Wilder-smoothed
//! alongside true range into DI lines, combined into a DX series, itself
//! Wilder-smoothed into ADX. Needs 2×period bars; degrades to zeros.

use crate::domain::ohlcv::OhlcvBar;

use super::moving_average::wilder_series;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

pub fn adx(bars: &[OhlcvBar], period: usize) -> AdxOutput {
    if period == 0 || bars.len() < 2 * period {
        return AdxOutput::default();
    }

    let n = bars.len() - 1;
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);
    let mut tr = Vec::with_capacity(n);

    for i in 1..bars.len() {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        tr.push(bars[i].true_range(bars[i - 1].close));
    }

    let smoothed_plus = wilder_series(&plus_dm, period);
    let smoothed_minus = wilder_series(&minus_dm, period);
    let smoothed_tr = wilder_series(&tr, period);

    let mut dx = Vec::with_capacity(n);
    for i in period - 1..n {
        let (p, m) = if smoothed_tr[i] != 0.0 {
            (
                smoothed_plus[i] / smoothed_tr[i] * 100.0,
                smoothed_minus[i] / smoothed_tr[i] * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        let sum = p + m;
        dx.push(if sum != 0.0 {
            (p - m).abs() / sum * 100.0
        } else {
            0.0
        });
    }

    let adx = match wilder_series(&dx, period).last() {
        Some(&v) => v,
        None => 0.0,
    };

    let last = n - 1;
    let (plus_di, minus_di) = if smoothed_tr[last] != 0.0 {
        (
            smoothed_plus[last] / smoothed_tr[last] * 100.0,
            smoothed_minus[last] / smoothed_tr[last] * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    AdxOutput {
        adx,
        plus_di,
        minus_di,
    }
}

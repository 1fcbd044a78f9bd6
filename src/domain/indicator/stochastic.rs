//! Stochastic oscillator.
//!
//! %K = (close - lowest_low(k)) / (highest_high(k) - lowest_low(k)) × 100,
//! 50 when the range is zero or the series is shorter than k.
//! %D = SMA of the %K series over d periods.

use crate::domain::ohlcv::OhlcvBar;

use super::moving_average::sma;

pub const DEFAULT_K: usize = 14;
pub const DEFAULT_D: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StochasticOutput {
    pub k: f64,
    pub d: f64,
}

impl Default for StochasticOutput {
    fn default() -> Self {
        StochasticOutput { k: 50.0, d: 50.0 }
    }
}

/// Latest %K/%D pair. Both 50 when the series is shorter than `k_period`.
pub fn stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> StochasticOutput {
    let k_values = stochastic_k_series(bars, k_period);
    if k_values.is_empty() {
        return StochasticOutput::default();
    }
    let k = k_values[k_values.len() - 1];
    let d = sma(&k_values, d_period);
    StochasticOutput { k, d }
}

/// Full %K series aligned with the input; warmup positions carry the
/// neutral 50 so element i equals the %K of the series truncated at i.
pub fn stochastic_k_series(bars: &[OhlcvBar], k_period: usize) -> Vec<f64> {
    if k_period == 0 {
        return vec![50.0; bars.len()];
    }
    let mut out = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i + 1 < k_period {
            out.push(50.0);
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = high - low;
        if range == 0.0 {
            out.push(50.0);
        } else {
            out.push((bars[i].close - low) / range * 100.0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(points: &[(f64, f64, f64)]) -> Vec<OhlcvBar> {
        points
            .iter()
            .map(|&(high, low, close)| OhlcvBar::new(close, high, low, close, 1000.0))
            .collect()
    }

    #[test]
    fn stochastic_insufficient_data_is_neutral() {
        let bars = make_bars(&[(110.0, 90.0, 100.0); 5]);
        let out = stochastic(&bars, 14, 3);
        assert!((out.k - 50.0).abs() < f64::EPSILON);
        assert!((out.d - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn k_at_top_of_range_is_100() {
        let mut points = vec![(110.0, 90.0, 100.0); 13];
        points.push((110.0, 90.0, 110.0));
        let out = stochastic(&make_bars(&points), 14, 3);
        assert!((out.k - 100.0).abs() < 1e-9);
    }

    #[test]
    fn k_at_bottom_of_range_is_0() {
        let mut points = vec![(110.0, 90.0, 100.0); 13];
        points.push((110.0, 90.0, 90.0));
        let out = stochastic(&make_bars(&points), 14, 3);
        assert!((out.k - 0.0).abs() < 1e-9);
    }

    #[test]
    fn zero_range_gives_neutral_k() {
        let bars = make_bars(&[(100.0, 100.0, 100.0); 20]);
        let out = stochastic(&bars, 14, 3);
        assert!((out.k - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn k_within_bounds() {
        let points: Vec<(f64, f64, f64)> = (0..40)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.8).sin() * 10.0;
                (base + 2.0, base - 2.0, base)
            })
            .collect();
        for k in stochastic_k_series(&make_bars(&points), 14) {
            assert!((0.0..=100.0).contains(&k), "%K {k} out of bounds");
        }
    }

    #[test]
    fn d_is_sma_of_k() {
        let points: Vec<(f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).cos() * 6.0;
                (base + 1.5, base - 1.5, base)
            })
            .collect();
        let bars = make_bars(&points);
        let k_values = stochastic_k_series(&bars, 14);
        let out = stochastic(&bars, 14, 3);
        let expected = k_values[k_values.len() - 3..].iter().sum::<f64>() / 3.0;
        assert!((out.d - expected).abs() < 1e-9);
    }
}

//! Average True Range, Wilder-smoothed.

use crate::domain::ohlcv::OhlcvBar;

use super::moving_average::wilder;

pub const DEFAULT_PERIOD: usize = 14;

/// Wilder-smoothed ATR of the latest bar. 0.0 with fewer than `period`
/// bars. The first bar's true range falls back to high - low.
pub fn atr(bars: &[OhlcvBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }
    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();
    wilder(&tr, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_bar(high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar::new(close, high, low, close, 1000.0)
    }

    #[test]
    fn atr_constant_range() {
        let bars: Vec<OhlcvBar> = (0..10).map(|_| make_bar(110.0, 90.0, 100.0)).collect();
        assert_relative_eq!(atr(&bars, 5), 20.0);
    }

    #[test]
    fn atr_insufficient_data_is_zero() {
        let bars = vec![make_bar(110.0, 90.0, 100.0); 3];
        assert!((atr(&bars, 14) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn atr_wilder_update() {
        let bars = vec![
            make_bar(110.0, 100.0, 105.0),
            make_bar(115.0, 105.0, 110.0),
            make_bar(120.0, 110.0, 115.0),
            make_bar(140.0, 120.0, 130.0),
        ];
        // seed = (10+10+10)/3 = 10; TR[3]=max(20,|140-115|,|120-115|)=25
        let expected = (10.0 * 2.0 + 25.0) / 3.0;
        assert_relative_eq!(atr(&bars, 3), expected, max_relative = 1e-9);
    }

    #[test]
    fn atr_gap_inflates_range() {
        let mut bars = vec![make_bar(110.0, 90.0, 100.0); 14];
        bars.push(make_bar(160.0, 150.0, 155.0));
        let with_gap = atr(&bars, 14);
        let without = atr(&bars[..14], 14);
        assert!(with_gap > without);
    }
}

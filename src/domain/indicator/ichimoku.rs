//! Ichimoku cloud components.
//!
//! Tenkan(9) and Kijun(26) are midpoints of the period high/low; Senkou A
//! is their mean; Senkou B is the 52-period midpoint. Shorter series use
//! whatever window is available.

use crate::domain::ohlcv::OhlcvBar;

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct IchimokuOutput {
    pub tenkan: f64,
    pub kijun: f64,
    pub senkou_a: f64,
    pub senkou_b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudPosition {
    Above,
    Below,
    Inside,
}

pub fn ichimoku(bars: &[OhlcvBar]) -> IchimokuOutput {
    if bars.is_empty() {
        return IchimokuOutput::default();
    }
    let tenkan = midpoint(bars, TENKAN_PERIOD);
    let kijun = midpoint(bars, KIJUN_PERIOD);
    IchimokuOutput {
        tenkan,
        kijun,
        senkou_a: (tenkan + kijun) / 2.0,
        senkou_b: midpoint(bars, SENKOU_B_PERIOD),
    }
}

/// Close relative to the cloud spanned by Senkou A and B.
pub fn cloud_position(bars: &[OhlcvBar]) -> CloudPosition {
    if bars.is_empty() {
        return CloudPosition::Inside;
    }
    let out = ichimoku(bars);
    let top = out.senkou_a.max(out.senkou_b);
    let bottom = out.senkou_a.min(out.senkou_b);
    let close = bars[bars.len() - 1].close;
    if close > top {
        CloudPosition::Above
    } else if close < bottom {
        CloudPosition::Below
    } else {
        CloudPosition::Inside
    }
}

/// Midpoint of the high/low range over the last `period` bars (or the
/// whole series if shorter).
fn midpoint(bars: &[OhlcvBar], period: usize) -> f64 {
    let start = bars.len().saturating_sub(period);
    let window = &bars[start..];
    let high = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    (high + low) / 2.0
}

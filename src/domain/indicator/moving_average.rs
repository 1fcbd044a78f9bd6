//! Simple, exponential and Wilder moving averages.
//!
//! SMA(data, n) is the mean of the last n values, or the last value when
//! fewer than n exist. EMA seeds from the SMA of the first n values, then
//! applies k = 2/(n+1); with fewer than n values it returns the last value
//! unchanged. Wilder smoothing seeds from the simple average of the first
//! n values, then updates as (prev*(n-1) + new)/n — used by RSI, ATR, ADX.

/// Mean of the last `period` values; the last value when the series is
/// shorter than the period; 0.0 for an empty series.
pub fn sma(data: &[f64], period: usize) -> f64 {
    if data.is_empty() || period == 0 {
        return 0.0;
    }
    if data.len() < period {
        return *data.last().expect("non-empty");
    }
    let window = &data[data.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Exponential moving average of the full series, seeded from the SMA of
/// the first `period` values.
pub fn ema(data: &[f64], period: usize) -> f64 {
    match ema_series(data, period).last() {
        Some(&v) => v,
        None => 0.0,
    }
}

/// Full EMA series aligned with the input. Positions before the seed carry
/// the raw input value, which keeps the series prefix-consistent: element
/// i equals `ema(&data[..=i], period)`.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if data.is_empty() || period == 0 {
        return data.to_vec();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(data.len());
    let mut prev = 0.0;

    for (i, &value) in data.iter().enumerate() {
        let current = if i + 1 < period {
            value
        } else if i + 1 == period {
            data[..period].iter().sum::<f64>() / period as f64
        } else {
            value * k + prev * (1.0 - k)
        };
        out.push(current);
        prev = current;
    }
    out
}

/// Final Wilder-smoothed value of a derived series (gains/losses, true
/// range, directional movement). Requires at least `period` values;
/// returns 0.0 otherwise.
pub fn wilder(data: &[f64], period: usize) -> f64 {
    match wilder_series(data, period).last() {
        Some(&v) => v,
        None => 0.0,
    }
}

/// Full Wilder-smoothed series. Elements before the seed (index
/// `period - 1`) are 0.0 and not meaningful; returns empty when the input
/// is shorter than the period.
pub fn wilder_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let mut out = vec![0.0; data.len()];
    let mut smoothed = data[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = smoothed;
    for i in period..data.len() {
        smoothed = (smoothed * (period - 1) as f64 + data[i]) / period as f64;
        out[i] = smoothed;
    }
    out
}

//! OHLCV bars, quotes and exchange rates — the plain-data inputs supplied
//! by collaborators (quote provider, persistence layer).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// A single price bar. Volume may be zero when the data source carries
/// none; volume-dependent computations degrade to their neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: Option<NaiveDate>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        OhlcvBar {
            date: None,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Latest quote for a symbol, supplied by an external quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub volume: f64,
    pub last_updated: Option<NaiveDateTime>,
}

/// Exchange rate snapshot, supplied by an external rate provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub as_of: Option<NaiveDateTime>,
}

/// Hard validation for a mandatory price series: at least one bar, and
/// every bar's high at or above its low.
pub fn validate_series(bars: &[OhlcvBar]) -> Result<(), EngineError> {
    if bars.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    for (index, bar) in bars.iter().enumerate() {
        if bar.high < bar.low {
            return Err(EngineError::InvalidBar {
                index,
                high: bar.high,
                low: bar.low,
            });
        }
    }
    Ok(())
}

/// Closing prices of a series.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

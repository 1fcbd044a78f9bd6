#![allow(dead_code)]

use chrono::NaiveDate;
use stocklens::domain::ledger::{Transaction, TransactionKind};
pub use stocklens::domain::ohlcv::{OhlcvBar, Quote};

/// Bars following a deterministic drifted sine walk, enough structure
/// for every indicator to produce non-degenerate values.
pub fn make_bars(count: usize, start: f64, drift: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let base = start + drift * i as f64 + 2.0 * ((i as f64) * 0.7).sin();
            let mut bar = OhlcvBar::new(
                base,
                base + 1.5,
                base - 1.5,
                base + 0.5,
                10_000.0 + 500.0 * (i % 7) as f64,
            );
            bar.date = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(i as u64));
            bar
        })
        .collect()
}

pub fn quote_for(symbol: &str, bars: &[OhlcvBar]) -> Quote {
    let last = bars.last().expect("bars must not be empty");
    Quote {
        symbol: symbol.to_string(),
        price: last.close,
        change: 0.0,
        change_percent: 0.0,
        open: last.open,
        high: last.high,
        low: last.low,
        previous_close: last.close,
        volume: last.volume,
        last_updated: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn buy(symbol: &str, shares: f64, price: f64, d: NaiveDate, rate: f64) -> Transaction {
    Transaction::new(symbol, TransactionKind::Buy, shares, price, d, 0.0, 0.0, rate)
}

pub fn sell(symbol: &str, shares: f64, price: f64, d: NaiveDate, rate: f64) -> Transaction {
    Transaction::new(symbol, TransactionKind::Sell, shares, price, d, 0.0, 0.0, rate)
}

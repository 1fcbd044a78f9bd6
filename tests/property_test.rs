//! Property tests for indicator ranges, pivot ordering and the ledger
//! accounting identities.

mod common;

use std::collections::HashMap;

use common::*;
use proptest::prelude::*;
use stocklens::domain::indicator::{
    adx, bollinger, macd_series, rsi, rsi_series, williams_r,
};
use stocklens::domain::ledger::{match_trades, Transaction, TransactionKind};
use stocklens::domain::levels::pivots::{pivots, PivotMethod};
use stocklens::domain::ohlcv::OhlcvBar;

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0f64, 1..max_len)
}

fn arb_bars(max_len: usize) -> impl Strategy<Value = Vec<OhlcvBar>> {
    prop::collection::vec((10.0..500.0f64, 0.0..5.0f64, 0.0..5.0f64, 0.0..100_000.0f64), 1..max_len)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(mid, up, down, volume)| {
                    let high = mid + up;
                    let low = mid - down;
                    OhlcvBar::new(mid, high, low, (high + low) / 2.0, volume)
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn rsi_stays_in_unit_band(closes in arb_closes(120), period in 2usize..30) {
        let value = rsi(&closes, period);
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn rsi_series_is_prefix_consistent(closes in arb_closes(80), period in 2usize..20) {
        let full = rsi_series(&closes, period);
        let cut = closes.len() / 2;
        let partial = rsi_series(&closes[..cut], period);
        for (a, b) in partial.iter().zip(full.iter()) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn adx_components_stay_in_band(bars in arb_bars(100), period in 2usize..20) {
        let out = adx(&bars, period);
        prop_assert!((0.0..=100.0).contains(&out.adx));
        prop_assert!((0.0..=100.0).contains(&out.plus_di));
        prop_assert!((0.0..=100.0).contains(&out.minus_di));
    }

    #[test]
    fn williams_r_stays_in_band(bars in arb_bars(60), period in 2usize..20) {
        let value = williams_r(&bars, period);
        prop_assert!((-100.0..=0.0).contains(&value));
    }

    #[test]
    fn macd_histogram_identity(closes in arb_closes(150)) {
        let series = macd_series(&closes, 12, 26, 9);
        for point in &series {
            prop_assert!((point.histogram - (point.macd - point.signal)).abs() < 1e-9);
        }
    }

    #[test]
    fn bollinger_bands_are_symmetric(closes in arb_closes(80), period in 2usize..30) {
        let out = bollinger(&closes, period, 2.0);
        prop_assert!(((out.upper - out.middle) - (out.middle - out.lower)).abs() < 1e-9);
        prop_assert!(out.upper >= out.middle && out.middle >= out.lower);
    }

    #[test]
    fn pivot_rungs_are_ordered_for_every_method(
        mid in 10.0..500.0f64,
        up in 0.1..20.0f64,
        down in 0.1..20.0f64,
        close_frac in 0.0..1.0f64,
    ) {
        let high = mid + up;
        let low = mid - down;
        let close = low + close_frac * (high - low);
        let bar = OhlcvBar::new(mid, high, low, close, 1000.0);
        for method in [
            PivotMethod::Standard,
            PivotMethod::Fibonacci,
            PivotMethod::Camarilla,
            PivotMethod::Woodie,
            PivotMethod::DeMark,
        ] {
            let p = pivots(&bar, method);
            prop_assert!(p.s3 < p.s2, "{method:?}");
            prop_assert!(p.s2 < p.s1, "{method:?}");
            prop_assert!(p.s1 < p.pivot, "{method:?}");
            prop_assert!(p.pivot < p.r1, "{method:?}");
            prop_assert!(p.r1 < p.r2, "{method:?}");
            prop_assert!(p.r2 < p.r3, "{method:?}");
        }
    }

    #[test]
    fn fifo_conserves_shares_and_profit(
        lots in prop::collection::vec((1.0..100.0f64, 10.0..200.0f64), 1..8),
        sell_fraction in 0.0..1.0f64,
        sell_price in 10.0..200.0f64,
    ) {
        let mut txs: Vec<Transaction> = lots
            .iter()
            .enumerate()
            .map(|(i, &(shares, price))| {
                Transaction::new(
                    "ACME",
                    TransactionKind::Buy,
                    shares,
                    price,
                    date(2024, 1, 1 + i as u32),
                    0.0,
                    0.0,
                    1.0,
                )
            })
            .collect();
        let bought: f64 = lots.iter().map(|l| l.0).sum();
        let sold = bought * sell_fraction;
        if sold > 1e-6 {
            txs.push(Transaction::new(
                "ACME",
                TransactionKind::Sell,
                sold,
                sell_price,
                date(2024, 2, 1),
                0.0,
                0.0,
                1.0,
            ));
        }

        let report = match_trades(&txs, &HashMap::new()).unwrap();
        let matched: f64 = report.completed.iter().map(|t| t.shares).sum();
        let open: f64 = report.open_positions.iter().map(|p| p.shares).sum();
        prop_assert!((matched + open - bought).abs() < 1e-6);

        // total profit matches cash in minus cash out for the matched shares
        let cost: f64 = report.completed.iter().map(|t| t.shares * t.buy_price).sum();
        let proceeds: f64 = report.completed.iter().map(|t| t.shares * t.sell_price).sum();
        let profit: f64 = report.completed.iter().map(|t| t.profit).sum();
        prop_assert!((profit - (proceeds - cost)).abs() < 1e-6);
    }

    #[test]
    fn profit_factor_rules_hold(outcomes in prop::collection::vec(-50.0..50.0f64, 0..20)) {
        let mut txs = Vec::new();
        for (i, delta) in outcomes.iter().enumerate() {
            txs.push(buy("ACME", 1.0, 100.0, date(2024, 1, 1 + i as u32), 1.0));
            txs.push(sell("ACME", 1.0, 100.0 + delta, date(2024, 2, 1 + i as u32), 1.0));
        }
        let report = match_trades(&txs, &HashMap::new()).unwrap();
        let stats = &report.stats;
        if stats.gross_losses > 0.0 {
            prop_assert!(stats.profit_factor.is_finite());
            prop_assert!((stats.profit_factor - stats.gross_gains / stats.gross_losses).abs() < 1e-9);
        } else if stats.gross_gains > 0.0 {
            prop_assert!(stats.profit_factor.is_infinite());
        } else {
            prop_assert!((stats.profit_factor - 0.0).abs() < 1e-9);
        }
        prop_assert!((0.0..=100.0).contains(&stats.win_rate));
    }
}

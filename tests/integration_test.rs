//! End-to-end tests across the analysis pipeline, the FIFO ledger and
//! the currency attribution.

mod common;

use std::collections::HashMap;

use common::*;
use stocklens::adapters::csv_ledger::read_transactions;
use stocklens::domain::currency::{analyze_currency, decompose_trade};
use stocklens::domain::indicator::{ema, sma};
use stocklens::domain::ledger::match_trades;
use stocklens::domain::levels::LevelConfig;
use stocklens::domain::synthesis::analyze;

#[test]
fn full_analysis_pipeline_produces_consistent_bundle() {
    let bars = make_bars(250, 100.0, 0.3);
    let quote = quote_for("ACME", &bars);
    let result = analyze("ACME", &bars, &quote, &LevelConfig::default()).unwrap();

    assert_eq!(result.symbol, "ACME");
    assert_eq!(result.interpretations.len(), 9);
    assert!(result.snapshot.rsi >= 0.0 && result.snapshot.rsi <= 100.0);
    assert!(result.analyses.williams_r.value >= -100.0 && result.analyses.williams_r.value <= 0.0);
    assert!(result.recommendation.confidence <= 100);
    assert!(result.recommendation.score >= -1.0 && result.recommendation.score <= 1.0);
    assert!(result.recommendation.target_support < quote.price);
    assert!(result.recommendation.target_resistance > quote.price);

    // levels come back sorted price-ascending on both sides
    for side in [&result.levels.supports, &result.levels.resistances] {
        for pair in side.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }
}

#[test]
fn sma_and_ema_reference_values() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert!((sma(&data, 3) - 4.0).abs() < 1e-9);

    // EMA reacts faster than SMA after a jump.
    let mut jumped: Vec<f64> = vec![100.0; 30];
    jumped.extend(std::iter::repeat(120.0).take(5));
    assert!(ema(&jumped, 10) > sma(&jumped, 10));
}

#[test]
fn csv_import_feeds_ledger_despite_out_of_order_rows() {
    let data = "symbol,type,shares,price,date,commission,vat,exchange_rate\n\
        ACME,sell,10,110.0,2024-02-02,5.0,1.0,35.0\n\
        ACME,buy,10,100.0,2024-01-02,5.0,1.0,33.0\n\
        WIDG,buy,bad,50.0,2024-01-03,0,0,1.0\n";
    let import = read_transactions(data.as_bytes()).unwrap();
    assert_eq!(import.transactions.len(), 2);
    assert_eq!(import.diagnostics.len(), 1);

    let report = match_trades(&import.transactions, &HashMap::new()).unwrap();
    assert_eq!(report.stats.total_trades, 1);
    let trade = &report.completed[0];
    // (110-100)*10 gross minus 12 of total costs
    assert!((trade.profit - 88.0).abs() < 1e-9);
    assert_eq!(trade.holding_days, 31);
    assert!(report.open_positions.is_empty());
}

#[test]
fn ledger_conserves_shares_per_symbol() {
    let txs = vec![
        buy("ACME", 10.0, 100.0, date(2024, 1, 2), 1.0),
        buy("ACME", 5.0, 102.0, date(2024, 1, 3), 1.0),
        sell("ACME", 8.0, 105.0, date(2024, 1, 10), 1.0),
        buy("WIDG", 7.0, 50.0, date(2024, 1, 4), 1.0),
    ];
    let report = match_trades(&txs, &HashMap::new()).unwrap();
    let sold: f64 = report.completed.iter().map(|t| t.shares).sum();
    let open: f64 = report.open_positions.iter().map(|p| p.shares).sum();
    assert!((sold + open - 22.0).abs() < 1e-9);
}

#[test]
fn currency_attribution_matches_ledger_output() {
    // Buy 10 @ 100 at rate 33, sell 10 @ 110 at rate 35.
    let txs = vec![
        buy("ACME", 10.0, 100.0, date(2024, 1, 2), 33.0),
        sell("ACME", 10.0, 110.0, date(2024, 2, 2), 35.0),
    ];
    let report = match_trades(&txs, &HashMap::new()).unwrap();
    let attribution = decompose_trade(&report.completed[0]);

    assert!((attribution.stock_pnl_base - 100.0).abs() < 1e-9);
    assert!((attribution.stock_pnl_local - 3500.0).abs() < 1e-9);
    assert!((attribution.currency_pnl_local - 2000.0).abs() < 1e-9);
    assert!(
        (attribution.stock_pnl_local + attribution.currency_pnl_local
            - attribution.total_pnl_local)
            .abs()
            < 1e-9
    );
}

#[test]
fn open_position_currency_rollup() {
    // Flat price, rate 33 → 35: all P&L is currency.
    let txs = vec![buy("ACME", 100.0, 30.0, date(2024, 1, 2), 33.0)];
    let report = match_trades(&txs, &HashMap::new()).unwrap();

    let quotes = HashMap::from([("ACME".to_string(), (30.0, 35.0))]);
    let currency = analyze_currency(&report.open_positions, &quotes);

    assert!((currency.total_stock_pnl_local - 0.0).abs() < 1e-9);
    assert!((currency.total_currency_pnl_local - 6000.0).abs() < 1e-9);
    assert!((currency.total_pnl_local - 6000.0).abs() < 1e-9);
    assert_eq!(currency.best_currency_effect.as_deref(), Some("ACME"));
}

#[test]
fn short_history_still_analyzes() {
    let bars = make_bars(5, 100.0, 0.5);
    let quote = quote_for("ACME", &bars);
    let result = analyze("ACME", &bars, &quote, &LevelConfig::default()).unwrap();

    // warmup fallbacks, not errors
    assert!((result.snapshot.rsi - 50.0).abs() < 1e-9);
    assert!((result.snapshot.macd.histogram - 0.0).abs() < 1e-9);
    assert!(result.recommendation.confidence <= 100);
}

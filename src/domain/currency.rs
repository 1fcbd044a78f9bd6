//! Currency attribution: splits local-currency P&L on foreign holdings
//! into a stock component (price move at today's rate) and a currency
//! component (rate move on the cost basis).
//!
//! The split is exact: stock + currency always equals the total
//! local-currency P&L, so the two components can be reported side by
//! side without a residual bucket.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ledger::{CompletedTrade, OpenPosition};

/// Attribution for one holding, in the holding's own currency
/// ("base") and the reporting currency ("local").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingAttribution {
    pub symbol: String,
    pub shares: f64,
    pub avg_cost: f64,
    pub avg_rate: f64,
    pub current_price: f64,
    pub current_rate: f64,
    pub cost_local: f64,
    pub value_local: f64,
    /// Price move in the holding's currency.
    pub stock_pnl_base: f64,
    /// Price move converted at today's rate.
    pub stock_pnl_local: f64,
    /// Rate move applied to the cost basis.
    pub currency_pnl_local: f64,
    pub total_pnl_local: f64,
}

/// Attribution for one closed trade, using the rates in force on each
/// leg's trade date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAttribution {
    pub symbol: String,
    pub shares: f64,
    pub stock_pnl_base: f64,
    pub stock_pnl_local: f64,
    pub currency_pnl_local: f64,
    pub total_pnl_local: f64,
}

/// Portfolio-level rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyReport {
    pub holdings: Vec<HoldingAttribution>,
    pub total_stock_pnl_local: f64,
    pub total_currency_pnl_local: f64,
    pub total_pnl_local: f64,
    /// Holding with the largest positive currency contribution.
    pub best_currency_effect: Option<String>,
    /// Holding with the largest negative currency contribution.
    pub worst_currency_effect: Option<String>,
}

/// Best and worst currency-timing among closed trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCurrencySummary {
    pub best: Option<TradeAttribution>,
    pub worst: Option<TradeAttribution>,
}

/// Decompose the unrealised P&L of one open holding.
pub fn decompose_holding(
    position: &OpenPosition,
    current_price: f64,
    current_rate: f64,
) -> HoldingAttribution {
    let cost_local = position.shares * position.avg_cost * position.avg_rate;
    let value_local = position.shares * current_price * current_rate;
    let stock_pnl_base = position.shares * (current_price - position.avg_cost);
    let stock_pnl_local = stock_pnl_base * current_rate;
    let currency_pnl_local =
        position.shares * position.avg_cost * (current_rate - position.avg_rate);

    HoldingAttribution {
        symbol: position.symbol.clone(),
        shares: position.shares,
        avg_cost: position.avg_cost,
        avg_rate: position.avg_rate,
        current_price,
        current_rate,
        cost_local,
        value_local,
        stock_pnl_base,
        stock_pnl_local,
        currency_pnl_local,
        total_pnl_local: value_local - cost_local,
    }
}

/// Decompose the realised P&L of one completed trade, gross of
/// transaction costs.
pub fn decompose_trade(trade: &CompletedTrade) -> TradeAttribution {
    let cost_local = trade.shares * trade.buy_price * trade.buy_rate;
    let value_local = trade.shares * trade.sell_price * trade.sell_rate;
    let stock_pnl_base = trade.shares * (trade.sell_price - trade.buy_price);
    let stock_pnl_local = stock_pnl_base * trade.sell_rate;
    let currency_pnl_local = trade.shares * trade.buy_price * (trade.sell_rate - trade.buy_rate);

    TradeAttribution {
        symbol: trade.symbol.clone(),
        shares: trade.shares,
        stock_pnl_base,
        stock_pnl_local,
        currency_pnl_local,
        total_pnl_local: value_local - cost_local,
    }
}

/// Rank closed trades by their currency contribution. Both slots are
/// `None` when there are no trades.
pub fn summarize_trades(completed: &[CompletedTrade]) -> TradeCurrencySummary {
    let attributions: Vec<TradeAttribution> = completed.iter().map(decompose_trade).collect();
    let best = attributions
        .iter()
        .max_by(|a, b| a.currency_pnl_local.total_cmp(&b.currency_pnl_local))
        .cloned();
    let worst = attributions
        .iter()
        .min_by(|a, b| a.currency_pnl_local.total_cmp(&b.currency_pnl_local))
        .cloned();
    TradeCurrencySummary { best, worst }
}

/// Aggregate attribution across open holdings. Positions with no
/// shares or no quote are skipped; best/worst pick the largest
/// positive and the largest negative currency contributions.
pub fn analyze_currency(
    positions: &[OpenPosition],
    quotes: &HashMap<String, (f64, f64)>,
) -> CurrencyReport {
    let holdings: Vec<HoldingAttribution> = positions
        .iter()
        .filter(|p| p.shares > 0.0)
        .filter_map(|p| {
            quotes
                .get(&p.symbol)
                .map(|&(price, rate)| decompose_holding(p, price, rate))
        })
        .collect();

    let total_stock_pnl_local = holdings.iter().map(|h| h.stock_pnl_local).sum();
    let total_currency_pnl_local = holdings.iter().map(|h| h.currency_pnl_local).sum();
    let total_pnl_local = holdings.iter().map(|h| h.total_pnl_local).sum();

    let best_currency_effect = holdings
        .iter()
        .filter(|h| h.currency_pnl_local > 0.0)
        .max_by(|a, b| a.currency_pnl_local.total_cmp(&b.currency_pnl_local))
        .map(|h| h.symbol.clone());
    let worst_currency_effect = holdings
        .iter()
        .filter(|h| h.currency_pnl_local < 0.0)
        .min_by(|a, b| a.currency_pnl_local.total_cmp(&b.currency_pnl_local))
        .map(|h| h.symbol.clone());

    CurrencyReport {
        holdings,
        total_stock_pnl_local,
        total_currency_pnl_local,
        total_pnl_local,
        best_currency_effect,
        worst_currency_effect,
    }
}

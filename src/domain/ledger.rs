//! FIFO trade ledger: matches sells against buy lots in arrival order,
//! carries transaction costs pro rata and derives per-portfolio trading
//! statistics.
//!
//! Transactions are sorted chronologically before matching, so callers
//! may hand over out-of-order imports. Selling more shares than the
//! open lots cover is a hard [`EngineError::Oversell`].

use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

/// One executed order. `gross_amount` is shares × price; `net_amount`
/// adds costs for buys and subtracts them for sells. `exchange_rate`
/// converts the trade currency into the reporting currency as of the
/// trade date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Owning portfolio, when the ledger spans more than one.
    #[serde(default)]
    pub portfolio_id: Option<String>,
    pub symbol: String,
    pub kind: TransactionKind,
    pub shares: f64,
    pub price: f64,
    pub date: NaiveDate,
    pub gross_amount: f64,
    pub commission: f64,
    pub vat: f64,
    pub net_amount: f64,
    pub exchange_rate: f64,
}

impl Transaction {
    /// Builds a transaction deriving the gross and net amounts.
    pub fn new(
        symbol: &str,
        kind: TransactionKind,
        shares: f64,
        price: f64,
        date: NaiveDate,
        commission: f64,
        vat: f64,
        exchange_rate: f64,
    ) -> Self {
        let gross_amount = shares * price;
        let costs = commission + vat;
        let net_amount = match kind {
            TransactionKind::Buy => gross_amount + costs,
            TransactionKind::Sell => gross_amount - costs,
        };
        Self {
            portfolio_id: None,
            symbol: symbol.to_string(),
            kind,
            shares,
            price,
            date,
            gross_amount,
            commission,
            vat,
            net_amount,
            exchange_rate,
        }
    }

    /// Tags the transaction with its owning portfolio.
    pub fn with_portfolio(mut self, portfolio_id: &str) -> Self {
        self.portfolio_id = Some(portfolio_id.to_string());
        self
    }
}

/// An open buy lot awaiting FIFO matching. Costs shrink pro rata as the
/// lot is consumed.
#[derive(Debug, Clone, PartialEq)]
struct TradeLot {
    shares: f64,
    price: f64,
    date: NaiveDate,
    commission: f64,
    vat: f64,
    exchange_rate: f64,
}

/// A buy lot (or part of one) closed by a sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTrade {
    pub symbol: String,
    pub shares: f64,
    pub buy_price: f64,
    pub sell_price: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub buy_rate: f64,
    pub sell_rate: f64,
    /// Pro-rata share of both legs' commission and VAT.
    pub costs: f64,
    /// Net profit: (sell − buy) × shares − costs.
    pub profit: f64,
    pub profit_pct: f64,
    pub holding_days: i64,
    pub win: bool,
}

/// Shares still held after matching, with the FIFO-weighted cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub shares: f64,
    pub avg_cost: f64,
    pub avg_rate: f64,
    pub total_cost: f64,
    pub first_buy: NaiveDate,
    /// Shares × current price; valued at average cost when no quote.
    pub current_value: f64,
    /// Unrealised P&L against the supplied current price, when known.
    pub unrealized_pnl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Wins / total × 100, 0 when no trades.
    pub win_rate: f64,
    pub total_profit: f64,
    pub gross_gains: f64,
    pub gross_losses: f64,
    /// Gains / losses; +∞ when gains with no losses, 0 otherwise.
    pub profit_factor: f64,
    pub avg_gain: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// win_rate/100 × avg_gain − loss_rate/100 × avg_loss.
    pub expectancy: f64,
    pub avg_holding_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub completed: Vec<CompletedTrade>,
    pub open_positions: Vec<OpenPosition>,
    pub stats: TradingStats,
}

/// Match all transactions FIFO and derive the report.
///
/// `prices` supplies current prices for unrealised P&L on open
/// positions; symbols without a price report `None`.
pub fn match_trades(
    transactions: &[Transaction],
    prices: &HashMap<String, f64>,
) -> Result<PerformanceReport, EngineError> {
    for (index, tx) in transactions.iter().enumerate() {
        let reason = if !(tx.shares > 0.0) {
            Some(format!("shares must be positive, got {}", tx.shares))
        } else if tx.price < 0.0 {
            Some(format!("price must not be negative, got {}", tx.price))
        } else if !(tx.exchange_rate > 0.0) {
            Some(format!(
                "exchange rate must be positive, got {}",
                tx.exchange_rate
            ))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(EngineError::InvalidTransaction {
                symbol: tx.symbol.clone(),
                index,
                reason,
            });
        }
    }

    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.date);

    // BTreeMap keeps open-position output deterministic by symbol.
    let mut lots: BTreeMap<String, VecDeque<TradeLot>> = BTreeMap::new();
    let mut completed = Vec::new();

    for tx in ordered {
        match tx.kind {
            TransactionKind::Buy => {
                lots.entry(tx.symbol.clone()).or_default().push_back(TradeLot {
                    shares: tx.shares,
                    price: tx.price,
                    date: tx.date,
                    commission: tx.commission,
                    vat: tx.vat,
                    exchange_rate: tx.exchange_rate,
                });
            }
            TransactionKind::Sell => {
                let queue = lots.entry(tx.symbol.clone()).or_default();
                let held: f64 = queue.iter().map(|l| l.shares).sum();
                if tx.shares > held + 1e-9 {
                    return Err(EngineError::Oversell {
                        symbol: tx.symbol.clone(),
                        shares: tx.shares - held,
                    });
                }

                let mut remaining = tx.shares;
                while remaining > 1e-9 {
                    let lot = queue
                        .front_mut()
                        .ok_or_else(|| EngineError::Oversell {
                            symbol: tx.symbol.clone(),
                            shares: remaining,
                        })?;
                    let matched = remaining.min(lot.shares);

                    let buy_fraction = matched / lot.shares;
                    let sell_fraction = matched / tx.shares;
                    let buy_commission = lot.commission * buy_fraction;
                    let buy_vat = lot.vat * buy_fraction;
                    let buy_costs = buy_commission + buy_vat;
                    let sell_costs = (tx.commission + tx.vat) * sell_fraction;
                    let costs = buy_costs + sell_costs;

                    let gross = (tx.price - lot.price) * matched;
                    let profit = gross - costs;
                    let basis = lot.price * matched + buy_costs;
                    let profit_pct = if basis > 0.0 {
                        profit / basis * 100.0
                    } else {
                        0.0
                    };

                    completed.push(CompletedTrade {
                        symbol: tx.symbol.clone(),
                        shares: matched,
                        buy_price: lot.price,
                        sell_price: tx.price,
                        buy_date: lot.date,
                        sell_date: tx.date,
                        buy_rate: lot.exchange_rate,
                        sell_rate: tx.exchange_rate,
                        costs,
                        profit,
                        profit_pct,
                        holding_days: (tx.date - lot.date).num_days(),
                        win: profit > 0.0,
                    });

                    lot.shares -= matched;
                    lot.commission -= buy_commission;
                    lot.vat -= buy_vat;
                    remaining -= matched;
                    if lot.shares <= 1e-9 {
                        queue.pop_front();
                    }
                }
            }
        }
    }

    let open_positions = lots
        .into_iter()
        .filter(|(_, queue)| !queue.is_empty())
        .map(|(symbol, queue)| {
            let shares: f64 = queue.iter().map(|l| l.shares).sum();
            let cost_basis: f64 = queue
                .iter()
                .map(|l| l.shares * l.price + l.commission + l.vat)
                .sum();
            let avg_cost = if shares > 0.0 {
                queue.iter().map(|l| l.shares * l.price).sum::<f64>() / shares
            } else {
                0.0
            };
            let avg_rate = if shares > 0.0 {
                queue
                    .iter()
                    .map(|l| l.shares * l.exchange_rate)
                    .sum::<f64>()
                    / shares
            } else {
                0.0
            };
            let first_buy = queue.front().map(|l| l.date).unwrap_or_default();
            let current_price = prices.get(&symbol).copied();
            let current_value = current_price.unwrap_or(avg_cost) * shares;
            let unrealized_pnl = current_price.map(|price| shares * price - cost_basis);
            OpenPosition {
                symbol,
                shares,
                avg_cost,
                avg_rate,
                total_cost: cost_basis,
                first_buy,
                current_value,
                unrealized_pnl,
            }
        })
        .collect();

    let stats = trading_stats(&completed);
    Ok(PerformanceReport {
        completed,
        open_positions,
        stats,
    })
}

/// Derive aggregate statistics over completed trades.
///
/// A zero-profit trade counts as a loss for the win rate but resets
/// both streak counters.
pub fn trading_stats(completed: &[CompletedTrade]) -> TradingStats {
    let total_trades = completed.len();
    let wins = completed.iter().filter(|t| t.profit > 0.0).count();
    let losses = total_trades - wins;

    let gross_gains: f64 = completed
        .iter()
        .filter(|t| t.profit > 0.0)
        .map(|t| t.profit)
        .sum();
    let gross_losses: f64 = completed
        .iter()
        .filter(|t| t.profit < 0.0)
        .map(|t| -t.profit)
        .sum();
    let loss_count = completed.iter().filter(|t| t.profit < 0.0).count();

    let win_rate = if total_trades > 0 {
        wins as f64 / total_trades as f64 * 100.0
    } else {
        0.0
    };
    let profit_factor = if gross_losses > 0.0 {
        gross_gains / gross_losses
    } else if gross_gains > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    let avg_gain = if wins > 0 { gross_gains / wins as f64 } else { 0.0 };
    let avg_loss = if loss_count > 0 {
        gross_losses / loss_count as f64
    } else {
        0.0
    };

    let largest_win = completed
        .iter()
        .map(|t| t.profit)
        .fold(0.0_f64, f64::max);
    let largest_loss = completed
        .iter()
        .map(|t| t.profit)
        .fold(0.0_f64, f64::min);

    let mut max_consecutive_wins = 0usize;
    let mut max_consecutive_losses = 0usize;
    let mut win_streak = 0usize;
    let mut loss_streak = 0usize;
    for trade in completed {
        if trade.profit > 0.0 {
            win_streak += 1;
            loss_streak = 0;
        } else if trade.profit < 0.0 {
            loss_streak += 1;
            win_streak = 0;
        } else {
            win_streak = 0;
            loss_streak = 0;
        }
        max_consecutive_wins = max_consecutive_wins.max(win_streak);
        max_consecutive_losses = max_consecutive_losses.max(loss_streak);
    }

    let loss_rate = 100.0 - win_rate;
    let expectancy = if total_trades > 0 {
        win_rate / 100.0 * avg_gain - loss_rate / 100.0 * avg_loss
    } else {
        0.0
    };
    let avg_holding_days = if total_trades > 0 {
        completed.iter().map(|t| t.holding_days as f64).sum::<f64>() / total_trades as f64
    } else {
        0.0
    };

    TradingStats {
        total_trades,
        wins,
        losses,
        win_rate,
        total_profit: gross_gains - gross_losses,
        gross_gains,
        gross_losses,
        profit_factor,
        avg_gain,
        avg_loss,
        largest_win,
        largest_loss,
        max_consecutive_wins,
        max_consecutive_losses,
        expectancy,
        avg_holding_days,
    }
}

//! stocklens — market analytics and P&L engine for a personal portfolio tracker.
//!
//! Pure, stateless computation: price history plus a transaction ledger in,
//! technical indicators, a consolidated support/resistance map, a weighted
//! trading recommendation and FIFO-matched P&L out. Domain logic lives in
//! [`domain`]; input adapters (CSV ledger import) in [`adapters`].

pub mod adapters;
pub mod domain;

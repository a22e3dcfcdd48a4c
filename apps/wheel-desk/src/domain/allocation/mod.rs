//! Allocation Bounded Context
//!
//! Aggregates per-ticker option opportunities and share positions into a
//! portfolio-wide earnings summary.
//!
//! # Key Concepts
//!
//! - **Ticker Snapshot**: latest stock price, shares, fetched call/put quotes
//!   and user settings for one ticker
//! - **Custom Ticker**: a user-added ticker with no shares, taking part in
//!   put-side math only
//! - **Earnings Summary**: weekly premium, exercise cost and return
//!   projections, recomputed on demand

pub mod services;
pub mod value_objects;

pub use services::{compute_summary, contract_sizing, opportunity_order};
pub use value_objects::{
    ContractSizing, EarningsSummary, TickerEarnings, TickerSettings, TickerSnapshot,
    WEEKS_PER_YEAR,
};

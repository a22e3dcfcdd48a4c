//! Domain Layer
//!
//! Business types and pure logic for the wheel desk, with no I/O and no
//! dependency on the application or infrastructure layers.
//!
//! # Bounded Contexts
//!
//! - **Shared**: tickers, order ids, money helpers and domain errors
//! - **Option Chain**: option types, quotes, expirations and the expiration calendar
//! - **Portfolio**: positions, account balances and weekly option income
//! - **Allocation**: the earnings summary across ticker snapshots
//! - **Rollover**: candidate selection, order-pair construction and the roll session
//! - **Order Tracking**: order drafts, backend orders and their statuses

pub mod allocation;
pub mod option_chain;
pub mod order_tracking;
pub mod portfolio;
pub mod rollover;
pub mod shared;

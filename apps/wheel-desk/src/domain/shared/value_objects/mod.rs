//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.

mod identifiers;
mod numeric;
mod symbol;

pub use identifiers::OrderId;
pub use numeric::{CONTRACT_MULTIPLIER, contract_notional, percent_of};
pub use symbol::Symbol;

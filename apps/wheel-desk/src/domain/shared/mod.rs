//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{CONTRACT_MULTIPLIER, OrderId, Symbol, contract_notional, percent_of};

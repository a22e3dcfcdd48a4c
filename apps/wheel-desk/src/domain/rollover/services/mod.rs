//! Rollover domain services.

mod order_builder;
mod selector;

pub use order_builder::build_order_pair;
pub use selector::{
    STRIKE_TOLERANCE, locate_quote, resolve_target_expiration, select_candidate, select_strike,
    target_strike,
};

//! Allocation domain services.

mod allocation_engine;
mod opportunity;

pub use allocation_engine::{compute_summary, contract_sizing};
pub use opportunity::opportunity_order;

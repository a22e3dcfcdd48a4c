//! Rollover Bounded Context
//!
//! Rolling a held short option: close it and open a replacement one
//! expiration later, nearest a target OTM strike.
//!
//! # Key Concepts
//!
//! - **Candidate**: the replacement quote selected from a fetched chain
//! - **Order Pair**: linked buy-to-close / sell-to-open legs, priced in
//!   different units (per contract and per share)
//! - **Roll Session**: the per-selection state machine driving fetch and
//!   submit

pub mod errors;
pub mod services;
pub mod session;
pub mod value_objects;

pub use errors::RolloverError;
pub use services::{
    STRIKE_TOLERANCE, build_order_pair, locate_quote, resolve_target_expiration,
    select_candidate, select_strike, target_strike,
};
pub use session::{FetchRequest, RolloverSession, RolloverSuggestion};
pub use value_objects::{
    CandidateQuery, CloseLeg, LegContract, OpenLeg, RolloverCandidate, RolloverOrderPair,
    RolloverPhase,
};

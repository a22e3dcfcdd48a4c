//! Rollover value objects.

mod candidate;
mod order_pair;
mod phase;

pub use candidate::{CandidateQuery, RolloverCandidate};
pub use order_pair::{CloseLeg, LegContract, OpenLeg, RolloverOrderPair};
pub use phase::RolloverPhase;

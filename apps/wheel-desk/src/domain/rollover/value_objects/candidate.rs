//! Selected replacement contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_chain::{Expiration, OptionQuote, OptionType};
use crate::domain::portfolio::Position;

/// Inputs for candidate selection besides the chain itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateQuery {
    /// Current underlying price.
    pub stock_price: Decimal,
    /// OTM target in percent.
    pub otm_pct: Decimal,
    /// Expiration the replacement should have.
    pub target_expiration: Expiration,
}

/// The best replacement for a held short option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverCandidate {
    /// Position being rolled.
    pub held: Position,
    /// Call or put, shared by both legs.
    pub option_type: OptionType,
    /// Underlying price used for the target.
    pub stock_price: Decimal,
    /// Held strike's distance from the stock price, in percent, positive
    /// while out of the money.
    pub distance_to_strike_pct: Decimal,
    /// OTM target in percent.
    pub otm_pct: Decimal,
    /// Ideal strike for the OTM target.
    pub target_strike: Decimal,
    /// Expiration of the replacement.
    pub target_expiration: Expiration,
    /// Chosen replacement quote.
    pub replacement: OptionQuote,
    /// Strike of the chosen quote.
    pub replacement_strike: Decimal,
}

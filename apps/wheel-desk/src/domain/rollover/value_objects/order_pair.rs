//! Linked buy-to-close / sell-to-open legs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_chain::{Expiration, OptionType};
use crate::domain::order_tracking::OrderType;
use crate::domain::shared::Symbol;

/// Contract terms common to both legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegContract {
    /// Underlying ticker.
    pub ticker: Symbol,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
    /// Contracts.
    pub quantity: u32,
    /// Raw bid at construction time.
    pub bid: Decimal,
    /// Raw ask at construction time.
    pub ask: Decimal,
}

/// BUY leg closing the held option, priced per contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseLeg {
    /// Contract terms.
    #[serde(flatten)]
    pub contract: LegContract,
    /// Pricing type.
    pub order_type: OrderType,
    /// Limit price for one contract (per-share price × 100).
    pub limit_price_per_contract: Decimal,
}

/// SELL leg opening the replacement, priced per share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLeg {
    /// Contract terms.
    #[serde(flatten)]
    pub contract: LegContract,
    /// Pricing type.
    pub order_type: OrderType,
    /// Limit price per share; the backend scales it to a contract.
    pub limit_price_per_unit: Decimal,
}

/// Both legs of a roll, submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverOrderPair {
    /// Closing leg.
    pub buy_to_close: CloseLeg,
    /// Opening leg.
    pub sell_to_open: OpenLeg,
}

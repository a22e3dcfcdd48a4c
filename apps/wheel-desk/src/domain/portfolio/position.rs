//! Held stock and option positions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_chain::{Expiration, OptionType};
use crate::domain::shared::Symbol;

/// Security type of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityType {
    /// Common stock / ETF shares.
    Stock,
    /// Listed equity option.
    Option,
}

/// Contract terms and quote data carried by an option position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDetails {
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
    /// Call or put.
    pub option_type: OptionType,
    /// Delta, if reported.
    pub delta: Option<f64>,
    /// Implied volatility, if reported.
    pub implied_volatility: Option<f64>,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Last traded price.
    pub last: Decimal,
}

impl OptionDetails {
    /// Contract terms with no quote data.
    #[must_use]
    pub const fn new(strike: Decimal, expiration: Expiration, option_type: OptionType) -> Self {
        Self {
            strike,
            expiration,
            option_type,
            delta: None,
            implied_volatility: None,
            bid: Decimal::ZERO,
            ask: Decimal::ZERO,
            last: Decimal::ZERO,
        }
    }

    /// Set bid and ask.
    #[must_use]
    pub const fn with_quote(mut self, bid: Decimal, ask: Decimal) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }
}

/// A broker position (stock or option).
///
/// For options, `symbol` is the underlying ticker and `quantity` is the signed
/// contract count (negative = short).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Underlying ticker.
    pub symbol: Symbol,
    /// Stock or option.
    pub security_type: SecurityType,
    /// Signed share or contract count.
    pub quantity: Decimal,
    /// Average cost (per share for stock, per contract for options).
    pub avg_cost: Decimal,
    /// Current market price.
    pub market_price: Decimal,
    /// Current market value.
    pub market_value: Decimal,
    /// Unrealized profit and loss.
    pub unrealized_pnl: Decimal,
    /// Option contract details; `None` for stock.
    pub option: Option<OptionDetails>,
}

impl Position {
    /// A stock position.
    #[must_use]
    pub fn stock(symbol: Symbol, shares: Decimal, market_price: Decimal) -> Self {
        Self {
            symbol,
            security_type: SecurityType::Stock,
            quantity: shares,
            avg_cost: Decimal::ZERO,
            market_price,
            market_value: shares * market_price,
            unrealized_pnl: Decimal::ZERO,
            option: None,
        }
    }

    /// An option position.
    #[must_use]
    pub fn option(symbol: Symbol, contracts: Decimal, details: OptionDetails) -> Self {
        Self {
            symbol,
            security_type: SecurityType::Option,
            quantity: contracts,
            avg_cost: Decimal::ZERO,
            market_price: Decimal::ZERO,
            market_value: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            option: Some(details),
        }
    }

    /// Set the average cost.
    #[must_use]
    pub const fn with_avg_cost(mut self, avg_cost: Decimal) -> Self {
        self.avg_cost = avg_cost;
        self
    }

    /// Set the market price.
    #[must_use]
    pub const fn with_market_price(mut self, market_price: Decimal) -> Self {
        self.market_price = market_price;
        self
    }

    /// Whether this is a stock position.
    #[must_use]
    pub const fn is_stock(&self) -> bool {
        matches!(self.security_type, SecurityType::Stock)
    }

    /// Whether this is a short option (written call or put).
    #[must_use]
    pub fn is_short_option(&self) -> bool {
        self.option.is_some() && self.quantity < Decimal::ZERO
    }

    /// Absolute contract or share count.
    #[must_use]
    pub fn abs_quantity(&self) -> Decimal {
        self.quantity.abs()
    }
}

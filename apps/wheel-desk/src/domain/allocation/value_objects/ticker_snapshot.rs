//! Per-ticker cache entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TickerSettings;
use crate::domain::option_chain::{OptionQuote, OptionType};
use crate::domain::shared::{CONTRACT_MULTIPLIER, Symbol};

/// Latest known data for one ticker.
///
/// The session replaces `stock_price`, `shares`, `calls` and `puts` as whole
/// values when a refresh completes; nothing patches individual quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Latest stock price.
    pub stock_price: Decimal,
    /// Shares held.
    pub shares: Decimal,
    /// Call quotes, nearest configured OTM strike first.
    pub calls: Vec<OptionQuote>,
    /// Put quotes, nearest configured OTM strike first.
    pub puts: Vec<OptionQuote>,
    /// User settings.
    pub settings: TickerSettings,
    /// User-added ticker with no underlying shares.
    pub is_custom: bool,
}

impl TickerSnapshot {
    /// Empty snapshot for a portfolio ticker.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            stock_price: Decimal::ZERO,
            shares: Decimal::ZERO,
            calls: Vec::new(),
            puts: Vec::new(),
            settings: TickerSettings::default(),
            is_custom: false,
        }
    }

    /// Empty snapshot for a custom ticker.
    #[must_use]
    pub fn custom(symbol: Symbol) -> Self {
        Self {
            is_custom: true,
            ..Self::new(symbol)
        }
    }

    /// Set price and shares.
    #[must_use]
    pub const fn with_position(mut self, stock_price: Decimal, shares: Decimal) -> Self {
        self.stock_price = stock_price;
        self.shares = shares;
        self
    }

    /// Set settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: TickerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the call quotes.
    #[must_use]
    pub fn with_calls(mut self, calls: Vec<OptionQuote>) -> Self {
        self.calls = calls;
        self
    }

    /// Replace the put quotes.
    #[must_use]
    pub fn with_puts(mut self, puts: Vec<OptionQuote>) -> Self {
        self.puts = puts;
        self
    }

    /// Whether at least one round lot of shares is held.
    #[must_use]
    pub fn has_round_lot(&self) -> bool {
        self.shares >= CONTRACT_MULTIPLIER
    }

    /// Whole contracts the share position covers.
    #[must_use]
    pub fn covered_contracts(&self) -> Decimal {
        if self.shares <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.shares / CONTRACT_MULTIPLIER).floor()
    }

    /// Market value of the share position, zero if it cannot be represented.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.shares
            .checked_mul(self.stock_price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Quote list for the given side.
    #[must_use]
    pub fn quotes(&self, option_type: OptionType) -> &[OptionQuote] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }
}

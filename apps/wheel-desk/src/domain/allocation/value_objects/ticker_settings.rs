//! User-configured per-ticker settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::option_chain::OptionType;
use crate::domain::shared::DomainError;

/// OTM targets and put sizing for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSettings {
    /// Call strike distance above the stock price, in percent.
    #[serde(default = "default_otm_pct")]
    pub call_otm_pct: Decimal,
    /// Put strike distance below the stock price, in percent.
    #[serde(default = "default_otm_pct")]
    pub put_otm_pct: Decimal,
    /// Explicit put contract count; derived from shares when unset.
    #[serde(default)]
    pub put_quantity: Option<u32>,
}

fn default_otm_pct() -> Decimal {
    dec!(10)
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self {
            call_otm_pct: default_otm_pct(),
            put_otm_pct: default_otm_pct(),
            put_quantity: None,
        }
    }
}

impl TickerSettings {
    /// Settings with the given call and put OTM targets.
    #[must_use]
    pub const fn new(call_otm_pct: Decimal, put_otm_pct: Decimal) -> Self {
        Self {
            call_otm_pct,
            put_otm_pct,
            put_quantity: None,
        }
    }

    /// Set an explicit put quantity.
    #[must_use]
    pub const fn with_put_quantity(mut self, quantity: u32) -> Self {
        self.put_quantity = Some(quantity);
        self
    }

    /// OTM target for the given side.
    #[must_use]
    pub const fn otm_pct(&self, option_type: OptionType) -> Decimal {
        match option_type {
            OptionType::Call => self.call_otm_pct,
            OptionType::Put => self.put_otm_pct,
        }
    }

    /// Validate percentage ranges and quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if an OTM percentage is outside
    /// `[0, 100)` or the put quantity is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("call_otm_pct", self.call_otm_pct),
            ("put_otm_pct", self.put_otm_pct),
        ] {
            if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
                return Err(DomainError::invalid_value(
                    field,
                    format!("{value} must be in [0, 100)"),
                ));
            }
        }
        if self.put_quantity == Some(0) {
            return Err(DomainError::invalid_value(
                "put_quantity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

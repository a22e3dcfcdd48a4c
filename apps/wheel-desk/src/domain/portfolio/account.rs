//! Account-level balance snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cash and account value reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioAccount {
    /// Broker account identifier, if known.
    pub account_id: Option<String>,
    /// Settled cash.
    pub cash_balance: Decimal,
    /// Authoritative account total (stock value plus cash), when reported.
    pub account_value: Option<Decimal>,
    /// Excess liquidity.
    pub excess_liquidity: Decimal,
    /// Initial margin requirement.
    pub initial_margin: Decimal,
    /// Leverage as a percentage of account value.
    pub leverage_percentage: Decimal,
}

impl PortfolioAccount {
    /// Account with only a cash balance.
    #[must_use]
    pub fn with_cash(cash_balance: Decimal) -> Self {
        Self {
            cash_balance,
            ..Self::default()
        }
    }

    /// Set the authoritative account total.
    #[must_use]
    pub const fn with_account_value(mut self, value: Decimal) -> Self {
        self.account_value = Some(value);
        self
    }

    /// The authoritative total, if it was reported and is non-zero.
    #[must_use]
    pub fn authoritative_total(&self) -> Option<Decimal> {
        self.account_value.filter(|v| !v.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_account_value_is_not_authoritative() {
        let account = PortfolioAccount::with_cash(dec!(5000)).with_account_value(Decimal::ZERO);
        assert_eq!(account.authoritative_total(), None);
    }

    #[test]
    fn reported_account_value_is_authoritative() {
        let account = PortfolioAccount::with_cash(dec!(5000)).with_account_value(dec!(90000));
        assert_eq!(account.authoritative_total(), Some(dec!(90000)));
    }
}

//! Derived earnings projections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

/// Weeks used to annualise weekly premium.
pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// Contract counts a ticker supports on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractSizing {
    /// Covered calls the share position supports.
    pub call_contracts: Decimal,
    /// Puts to sell: explicit setting, else round lots held, else one.
    pub put_contracts: Decimal,
    /// Whether the ticker takes part in the summary at all.
    pub participates: bool,
}

/// One ticker's contribution to the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEarnings {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// User-added ticker.
    pub is_custom: bool,
    /// Value of the covering share position.
    pub stock_value: Decimal,
    /// Covered call contracts.
    pub call_contracts: Decimal,
    /// Weekly call premium.
    pub call_premium: Decimal,
    /// Put contracts.
    pub put_contracts: Decimal,
    /// Weekly put premium.
    pub put_premium: Decimal,
    /// Cash needed if every put is exercised.
    pub put_exercise_cost: Decimal,
    /// Put premium over exercise cost, in percent.
    pub return_on_cash: Decimal,
    /// Call premium over stock value, in percent.
    pub return_on_capital: Decimal,
}

/// Portfolio-wide earnings summary.
///
/// `total_weekly_premium` always equals call plus put premium and
/// `projected_annual_earnings` is always the weekly total times 52. The
/// return percentages are zero whenever `total_portfolio_value` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EarningsSummary {
    /// Weekly premium from covered calls.
    pub total_weekly_call_premium: Decimal,
    /// Weekly premium from puts.
    pub total_weekly_put_premium: Decimal,
    /// Call plus put premium.
    pub total_weekly_premium: Decimal,
    /// Value of round-lot share positions.
    pub portfolio_stock_value: Decimal,
    /// Account cash.
    pub cash_balance: Decimal,
    /// Denominator for the return percentages.
    pub total_portfolio_value: Decimal,
    /// Cash needed if every put is exercised.
    pub total_put_exercise_cost: Decimal,
    /// Weekly premium over portfolio value, in percent.
    pub weekly_return_pct: Decimal,
    /// Weekly premium times 52.
    pub projected_annual_earnings: Decimal,
    /// Annual earnings over portfolio value, in percent.
    pub projected_annual_return_pct: Decimal,
    /// Contributing tickers in input order.
    pub tickers: Vec<TickerEarnings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weeks_per_year_is_52() {
        assert_eq!(WEEKS_PER_YEAR, Decimal::from(52));
    }
}

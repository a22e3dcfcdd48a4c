//! Expected income from short options expiring this week.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Position;
use crate::domain::option_chain::{Expiration, OptionType, closest_friday};
use crate::domain::shared::{Symbol, contract_notional};

/// One short option expiring by the end of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyIncomeLine {
    /// Underlying ticker.
    pub symbol: Symbol,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
    /// Contracts written.
    pub contracts: Decimal,
    /// Premium received per contract.
    pub premium_per_contract: Decimal,
    /// Premium across all contracts.
    pub income: Decimal,
    /// Cash at risk if a put is assigned; `None` for calls.
    pub put_notional: Option<Decimal>,
}

/// Income report for the week ending `week_ending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyIncome {
    /// Friday closing the week.
    pub week_ending: Expiration,
    /// Contributing positions.
    pub positions: Vec<WeeklyIncomeLine>,
    /// Sum of `income`.
    pub total_income: Decimal,
    /// Sum of put notionals.
    pub total_put_notional: Decimal,
}

impl WeeklyIncome {
    /// Number of contributing positions.
    #[must_use]
    pub fn positions_count(&self) -> usize {
        self.positions.len()
    }
}

/// Collect short options expiring on or before this week's Friday.
///
/// Income is average cost (already per contract) times contracts written.
#[must_use]
pub fn weekly_option_income(positions: &[Position], today: NaiveDate) -> WeeklyIncome {
    let week_ending = closest_friday(today);

    let lines: Vec<WeeklyIncomeLine> = positions
        .iter()
        .filter(|p| p.is_short_option())
        .filter_map(|p| {
            let details = p.option.as_ref()?;
            if details.expiration > week_ending {
                return None;
            }
            let contracts = p.abs_quantity();
            let put_notional = matches!(details.option_type, OptionType::Put)
                .then(|| contract_notional(details.strike, contracts))
                .flatten();
            Some(WeeklyIncomeLine {
                symbol: p.symbol.clone(),
                option_type: details.option_type,
                strike: details.strike,
                expiration: details.expiration,
                contracts,
                premium_per_contract: p.avg_cost,
                income: p.avg_cost.checked_mul(contracts).unwrap_or(Decimal::ZERO),
                put_notional,
            })
        })
        .collect();

    WeeklyIncome {
        week_ending,
        total_income: lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.income)),
        total_put_notional: lines
            .iter()
            .filter_map(|l| l.put_notional)
            .fold(Decimal::ZERO, |acc, n| acc.saturating_add(n)),
        positions: lines,
    }
}

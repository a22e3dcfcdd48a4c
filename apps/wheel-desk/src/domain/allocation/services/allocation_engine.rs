//! Earnings aggregation across ticker snapshots.

use rust_decimal::Decimal;

use crate::domain::allocation::value_objects::{
    ContractSizing, EarningsSummary, TickerEarnings, TickerSnapshot, WEEKS_PER_YEAR,
};
use crate::domain::portfolio::PortfolioAccount;
use crate::domain::shared::{contract_notional, percent_of};

/// Contract counts a snapshot supports.
///
/// Odd-lot portfolio tickers do not participate. Custom tickers never sell
/// calls. The put count is the explicit setting, else one contract per
/// full hundred shares, else one.
#[must_use]
pub fn contract_sizing(snapshot: &TickerSnapshot) -> ContractSizing {
    let round_lot = snapshot.has_round_lot();
    if !round_lot && !snapshot.is_custom {
        return ContractSizing::default();
    }

    let call_contracts = if round_lot && !snapshot.is_custom {
        snapshot.covered_contracts()
    } else {
        Decimal::ZERO
    };
    let put_contracts = match snapshot.settings.put_quantity {
        Some(quantity) => Decimal::from(quantity),
        None if round_lot => snapshot.covered_contracts(),
        None => Decimal::ONE,
    };

    ContractSizing {
        call_contracts,
        put_contracts,
        participates: true,
    }
}

/// Aggregate weekly premium and return projections.
///
/// Pure and deterministic: the same snapshots and account always produce
/// the same summary. The first quote of each side is taken as the nearest
/// OTM match, since the chain fetch is already filtered by the ticker's
/// settings. Missing prices or strikes contribute zero, as do products too
/// large to represent. Totals saturate instead of overflowing.
#[must_use]
pub fn compute_summary(
    snapshots: &[TickerSnapshot],
    account: &PortfolioAccount,
) -> EarningsSummary {
    let mut summary = EarningsSummary {
        cash_balance: account.cash_balance,
        ..EarningsSummary::default()
    };

    for snapshot in snapshots {
        let sizing = contract_sizing(snapshot);
        if !sizing.participates {
            continue;
        }
        let ticker = ticker_earnings(snapshot, sizing);

        summary.portfolio_stock_value =
            summary.portfolio_stock_value.saturating_add(ticker.stock_value);
        summary.total_weekly_call_premium =
            summary.total_weekly_call_premium.saturating_add(ticker.call_premium);
        summary.total_weekly_put_premium =
            summary.total_weekly_put_premium.saturating_add(ticker.put_premium);
        summary.total_put_exercise_cost =
            summary.total_put_exercise_cost.saturating_add(ticker.put_exercise_cost);
        summary.tickers.push(ticker);
    }

    summary.total_weekly_premium = summary
        .total_weekly_call_premium
        .saturating_add(summary.total_weekly_put_premium);
    summary.total_portfolio_value = account.authoritative_total().unwrap_or_else(|| {
        summary
            .portfolio_stock_value
            .saturating_add(summary.cash_balance)
    });
    summary.projected_annual_earnings =
        summary.total_weekly_premium.saturating_mul(WEEKS_PER_YEAR);

    if summary.total_portfolio_value > Decimal::ZERO {
        summary.weekly_return_pct =
            percent_of(summary.total_weekly_premium, summary.total_portfolio_value);
        summary.projected_annual_return_pct =
            percent_of(summary.projected_annual_earnings, summary.total_portfolio_value);
    }

    summary
}

fn ticker_earnings(snapshot: &TickerSnapshot, sizing: ContractSizing) -> TickerEarnings {
    let stock_value = if snapshot.is_custom {
        Decimal::ZERO
    } else {
        snapshot.stock_value()
    };

    let call_premium = snapshot
        .calls
        .first()
        .filter(|_| sizing.call_contracts > Decimal::ZERO)
        .and_then(|quote| contract_notional(quote.ask_or_zero(), sizing.call_contracts))
        .unwrap_or(Decimal::ZERO);

    let (put_premium, put_exercise_cost) =
        snapshot.puts.first().map_or((Decimal::ZERO, Decimal::ZERO), |quote| {
            let premium = contract_notional(quote.ask_or_zero(), sizing.put_contracts)
                .unwrap_or(Decimal::ZERO);
            let exercise = quote
                .strike
                .filter(|strike| *strike > Decimal::ZERO)
                .and_then(|strike| contract_notional(strike, sizing.put_contracts))
                .unwrap_or(Decimal::ZERO);
            (premium, exercise)
        });

    TickerEarnings {
        symbol: snapshot.symbol.clone(),
        is_custom: snapshot.is_custom,
        stock_value,
        call_contracts: sizing.call_contracts,
        call_premium,
        put_contracts: sizing.put_contracts,
        put_premium,
        put_exercise_cost,
        return_on_cash: percent_of(put_premium, put_exercise_cost),
        return_on_capital: percent_of(call_premium, stock_value),
    }
}

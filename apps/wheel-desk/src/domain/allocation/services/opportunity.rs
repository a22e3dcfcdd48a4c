//! SELL order drafts for the opportunities a snapshot shows.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::allocation_engine::contract_sizing;
use crate::domain::allocation::value_objects::TickerSnapshot;
use crate::domain::option_chain::OptionType;
use crate::domain::order_tracking::{EarningsMetadata, OrderAction, OrderDraft, OrderType};
use crate::domain::shared::{CONTRACT_MULTIPLIER, DomainError, contract_notional, percent_of};

/// Draft a SELL order from the first quote on one side of a snapshot.
///
/// Quantity follows the same sizing as the earnings summary. The draft
/// carries the projected premium and returns so the backend can store them
/// with the order.
///
/// # Errors
///
/// Returns `DomainError::InvalidValue` if the ticker does not support any
/// contracts on that side, or the first quote has no strike, no expiration
/// or no price.
pub fn opportunity_order(
    snapshot: &TickerSnapshot,
    option_type: OptionType,
) -> Result<OrderDraft, DomainError> {
    let sizing = contract_sizing(snapshot);
    let contracts = match option_type {
        OptionType::Call => sizing.call_contracts,
        OptionType::Put => sizing.put_contracts,
    };
    let quantity = contracts.trunc().to_u32().unwrap_or(0);
    if !sizing.participates || quantity == 0 {
        return Err(DomainError::invalid_value(
            "quantity",
            format!("{} supports no {option_type} contracts", snapshot.symbol),
        ));
    }

    let quote = snapshot.quotes(option_type).first().ok_or_else(|| {
        DomainError::invalid_value(
            "quote",
            format!("no {option_type} quotes for {}", snapshot.symbol),
        )
    })?;
    let strike = quote
        .strike
        .ok_or_else(|| DomainError::invalid_value("strike", "quote has no usable strike"))?;
    let expiration = quote
        .expiration
        .ok_or_else(|| DomainError::invalid_value("expiration", "quote has no expiration"))?;
    let premium = if quote.ask > Decimal::ZERO {
        quote.ask
    } else {
        quote
            .mid_price()
            .ok_or_else(|| DomainError::invalid_value("premium", "quote has no bid or ask"))?
    };

    let premium_per_contract = premium
        .checked_mul(CONTRACT_MULTIPLIER)
        .ok_or_else(|| DomainError::invalid_value("premium", "premium out of range"))?;
    let total_premium = premium_per_contract
        .checked_mul(contracts)
        .ok_or_else(|| DomainError::invalid_value("premium", "premium out of range"))?;
    let (return_on_cash, return_on_capital) = match option_type {
        OptionType::Call => (
            Decimal::ZERO,
            percent_of(total_premium, snapshot.stock_value()),
        ),
        OptionType::Put => (
            percent_of(
                total_premium,
                contract_notional(strike, contracts).unwrap_or(Decimal::ZERO),
            ),
            Decimal::ZERO,
        ),
    };

    Ok(OrderDraft {
        ticker: snapshot.symbol.clone(),
        option_type,
        action: OrderAction::Sell,
        strike,
        expiration,
        quantity,
        order_type: OrderType::Limit,
        premium,
        quote: quote.clone(),
        earnings: Some(EarningsMetadata {
            max_contracts: quantity,
            premium_per_contract,
            total_premium,
            return_on_cash,
            return_on_capital,
        }),
    })
}

//! Buy-to-close / sell-to-open pair construction.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::order_tracking::OrderType;
use crate::domain::rollover::errors::RolloverError;
use crate::domain::rollover::value_objects::{
    CloseLeg, LegContract, OpenLeg, RolloverCandidate, RolloverOrderPair,
};
use crate::domain::shared::CONTRACT_MULTIPLIER;

fn positive(value: Decimal) -> Option<Decimal> {
    (value > Decimal::ZERO).then_some(value)
}

/// Build the linked order pair for a candidate.
///
/// The closing leg is limited at the held option's ask (falling back to its
/// market price, then last, then bid) scaled to one contract. The opening
/// leg is limited at the replacement's bid/ask midpoint per share.
///
/// # Errors
///
/// Returns `InvalidPosition` when the held quantity is zero and
/// `PriceIntegrity` when either leg has no positive price source.
pub fn build_order_pair(candidate: &RolloverCandidate) -> Result<RolloverOrderPair, RolloverError> {
    let held = &candidate.held;
    let details = held.option.as_ref().ok_or_else(|| {
        RolloverError::InvalidPosition(format!("{} is not an option", held.symbol))
    })?;
    let quantity = held
        .abs_quantity()
        .trunc()
        .to_u32()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            RolloverError::InvalidPosition(format!("{} has no contracts to roll", held.symbol))
        })?;

    let close_price = positive(details.ask)
        .or_else(|| positive(held.market_price))
        .or_else(|| positive(details.last))
        .or_else(|| positive(details.bid))
        .ok_or(RolloverError::PriceIntegrity { leg: "buy_to_close" })?;

    let replacement = &candidate.replacement;
    let open_price = replacement
        .mid_price()
        .or_else(|| positive(replacement.last))
        .ok_or(RolloverError::PriceIntegrity { leg: "sell_to_open" })?;
    let close_per_contract = close_price
        .checked_mul(CONTRACT_MULTIPLIER)
        .ok_or(RolloverError::PriceIntegrity { leg: "buy_to_close" })?;

    Ok(RolloverOrderPair {
        buy_to_close: CloseLeg {
            contract: LegContract {
                ticker: held.symbol.clone(),
                option_type: details.option_type,
                strike: details.strike,
                expiration: details.expiration,
                quantity,
                bid: details.bid,
                ask: details.ask,
            },
            order_type: OrderType::Limit,
            limit_price_per_contract: close_per_contract,
        },
        sell_to_open: OpenLeg {
            contract: LegContract {
                ticker: held.symbol.clone(),
                option_type: candidate.option_type,
                strike: candidate.replacement_strike,
                expiration: candidate.target_expiration,
                quantity,
                bid: replacement.bid,
                ask: replacement.ask,
            },
            order_type: OrderType::Limit,
            limit_price_per_unit: open_price,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option_chain::{Expiration, OptionQuote, OptionType};
    use crate::domain::portfolio::{OptionDetails, Position};
    use crate::domain::shared::Symbol;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn exp(d: u32) -> Expiration {
        Expiration::new(NaiveDate::from_ymd_opt(2025, 1, d).unwrap())
    }

    fn candidate(
        held_bid: Decimal,
        held_ask: Decimal,
        replacement: OptionQuote,
    ) -> RolloverCandidate {
        let held = Position::option(
            Symbol::new("AAPL"),
            dec!(-2),
            OptionDetails::new(dec!(160), exp(17), OptionType::Call).with_quote(held_bid, held_ask),
        );
        RolloverCandidate {
            held,
            option_type: OptionType::Call,
            stock_price: dec!(158),
            distance_to_strike_pct: dec!(1.27),
            otm_pct: dec!(10),
            target_strike: dec!(173.8),
            target_expiration: exp(24),
            replacement_strike: replacement.strike.unwrap_or_default(),
            replacement,
        }
    }

    #[test]
    fn legs_use_different_price_units() {
        let pair = build_order_pair(&candidate(
            dec!(2.10),
            dec!(2.30),
            OptionQuote::new(dec!(175), dec!(1.10), dec!(1.30)),
        ))
        .unwrap();

        assert_eq!(pair.buy_to_close.limit_price_per_contract, dec!(230));
        assert_eq!(pair.sell_to_open.limit_price_per_unit, dec!(1.20));
        assert_eq!(pair.buy_to_close.contract.quantity, 2);
        assert_eq!(pair.sell_to_open.contract.quantity, 2);
        assert_eq!(pair.buy_to_close.contract.bid, dec!(2.10));
        assert_eq!(pair.sell_to_open.contract.ask, dec!(1.30));
        assert_eq!(pair.sell_to_open.contract.strike, dec!(175));
        assert_eq!(pair.sell_to_open.contract.expiration, exp(24));
        assert_eq!(pair.buy_to_close.contract.expiration, exp(17));
    }

    #[test]
    fn close_leg_falls_back_to_market_price() {
        let mut c = candidate(
            Decimal::ZERO,
            Decimal::ZERO,
            OptionQuote::new(dec!(175), dec!(1.10), dec!(1.30)),
        );
        c.held = c.held.with_market_price(dec!(2.25));
        let pair = build_order_pair(&c).unwrap();
        assert_eq!(pair.buy_to_close.limit_price_per_contract, dec!(225));
    }

    #[test]
    fn open_leg_falls_back_to_available_side() {
        let pair = build_order_pair(&candidate(
            dec!(2.10),
            dec!(2.30),
            OptionQuote::new(dec!(175), Decimal::ZERO, dec!(1.30)),
        ))
        .unwrap();
        assert_eq!(pair.sell_to_open.limit_price_per_unit, dec!(1.30));
    }

    #[test]
    fn unpriced_close_leg_is_rejected() {
        let result = build_order_pair(&candidate(
            Decimal::ZERO,
            Decimal::ZERO,
            OptionQuote::new(dec!(175), dec!(1.10), dec!(1.30)),
        ));
        assert_eq!(
            result,
            Err(RolloverError::PriceIntegrity { leg: "buy_to_close" })
        );
    }

    #[test]
    fn unrepresentable_close_price_is_rejected() {
        let result = build_order_pair(&candidate(
            dec!(2.10),
            Decimal::MAX,
            OptionQuote::new(dec!(175), dec!(1.10), dec!(1.30)),
        ));
        assert_eq!(
            result,
            Err(RolloverError::PriceIntegrity { leg: "buy_to_close" })
        );
    }

    #[test]
    fn unpriced_open_leg_is_rejected() {
        let result = build_order_pair(&candidate(
            dec!(2.10),
            dec!(2.30),
            OptionQuote::new(dec!(175), Decimal::ZERO, Decimal::ZERO),
        ));
        assert_eq!(
            result,
            Err(RolloverError::PriceIntegrity { leg: "sell_to_open" })
        );
    }

    #[test]
    fn last_price_rescues_one_sided_quotes() {
        let pair = build_order_pair(&candidate(
            dec!(2.10),
            dec!(2.30),
            OptionQuote::new(dec!(175), Decimal::ZERO, Decimal::ZERO).with_last(dec!(0.95)),
        ))
        .unwrap();
        assert_eq!(pair.sell_to_open.limit_price_per_unit, dec!(0.95));
    }
}

//! Replacement contract selection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::option_chain::{Expiration, OptionQuote, OptionType};
use crate::domain::portfolio::Position;
use crate::domain::rollover::errors::RolloverError;
use crate::domain::rollover::value_objects::{CandidateQuery, RolloverCandidate};
use crate::domain::shared::percent_of;

/// Largest strike difference still treated as the same strike.
pub const STRIKE_TOLERANCE: Decimal = dec!(0.01);

/// Ideal strike for an OTM target: above the price for calls, below for puts.
///
/// `None` if the strike cannot be represented.
#[must_use]
pub fn target_strike(
    stock_price: Decimal,
    otm_pct: Decimal,
    option_type: OptionType,
) -> Option<Decimal> {
    let offset = otm_pct.checked_div(Decimal::ONE_HUNDRED)?;
    let factor = match option_type {
        OptionType::Call => Decimal::ONE.checked_add(offset)?,
        OptionType::Put => Decimal::ONE.checked_sub(offset)?,
    };
    stock_price.checked_mul(factor)
}

/// Strike nearest `target` among quotes with a usable strike.
///
/// Ties keep the first strike encountered. Returns `None` when no quote
/// carries a positive strike.
#[must_use]
pub fn select_strike<'a>(
    quotes: impl IntoIterator<Item = &'a OptionQuote>,
    target: Decimal,
) -> Option<Decimal> {
    let mut best: Option<(Decimal, Decimal)> = None;
    for strike in quotes
        .into_iter()
        .filter_map(|q| q.strike)
        .filter(|s| *s > Decimal::ZERO)
    {
        let Some(distance) = strike.checked_sub(target).map(|d| d.abs()) else {
            continue;
        };
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((strike, distance));
        }
    }
    best.map(|(strike, _)| strike)
}

/// Quote with `strike`, and with `expiration` when one is given.
///
/// An exact strike match is preferred; otherwise the first quote within
/// [`STRIKE_TOLERANCE`] is returned. Quotes that report no expiration
/// match any expiration.
#[must_use]
pub fn locate_quote(
    quotes: &[OptionQuote],
    strike: Decimal,
    expiration: Option<Expiration>,
) -> Option<&OptionQuote> {
    let matching = |q: &&OptionQuote| expiration_matches(q, expiration);
    quotes
        .iter()
        .filter(matching)
        .find(|q| q.strike == Some(strike))
        .or_else(|| {
            quotes.iter().filter(matching).find(|q| {
                q.strike
                    .and_then(|s| s.checked_sub(strike))
                    .is_some_and(|d| d.abs() <= STRIKE_TOLERANCE)
            })
        })
}

fn expiration_matches(quote: &OptionQuote, expiration: Option<Expiration>) -> bool {
    match (quote.expiration, expiration) {
        (Some(have), Some(want)) => have == want,
        _ => true,
    }
}

/// Pick the replacement for `held` from a fetched chain.
///
/// Only quotes for `expiration` take part when it is given; pass `None`
/// when the fetch was already filtered to the target expiration.
///
/// # Errors
///
/// Returns `InvalidPosition` if `held` is not an option, and `NoCandidate`
/// if the chain is empty, the target strike is out of range, or no quote
/// sits at the chosen strike.
pub fn select_candidate(
    held: &Position,
    query: CandidateQuery,
    chain: &[OptionQuote],
    expiration: Option<Expiration>,
) -> Result<RolloverCandidate, RolloverError> {
    let details = held.option.as_ref().ok_or_else(|| {
        RolloverError::InvalidPosition(format!("{} is not an option", held.symbol))
    })?;

    if chain.is_empty() {
        return Err(RolloverError::no_candidate(format!(
            "empty {} chain for {}",
            details.option_type, held.symbol
        )));
    }

    let target = target_strike(query.stock_price, query.otm_pct, details.option_type)
        .ok_or_else(|| {
            RolloverError::no_candidate(format!("target strike out of range for {}", held.symbol))
        })?;
    let eligible = chain.iter().filter(|q| expiration_matches(q, expiration));
    let strike = select_strike(eligible, target).ok_or_else(|| {
        RolloverError::no_candidate(format!("no valid strikes in chain for {}", held.symbol))
    })?;
    let replacement = locate_quote(chain, strike, expiration).ok_or_else(|| {
        RolloverError::no_candidate(format!("no quote at strike {strike} for {}", held.symbol))
    })?;

    let distance = match details.option_type {
        OptionType::Call => details.strike.checked_sub(query.stock_price),
        OptionType::Put => query.stock_price.checked_sub(details.strike),
    }
    .unwrap_or(Decimal::ZERO);

    Ok(RolloverCandidate {
        held: held.clone(),
        option_type: details.option_type,
        stock_price: query.stock_price,
        distance_to_strike_pct: percent_of(distance, query.stock_price),
        otm_pct: query.otm_pct,
        target_strike: target,
        target_expiration: replacement.expiration.unwrap_or(query.target_expiration),
        replacement: replacement.clone(),
        replacement_strike: replacement.strike.unwrap_or(strike),
    })
}

/// Nearest listed expiration on or after `current + offset_days`.
///
/// Falls back to the computed date itself when nothing listed qualifies,
/// including when the listing could not be fetched.
#[must_use]
pub fn resolve_target_expiration(
    current: Expiration,
    listed: &[Expiration],
    offset_days: i64,
) -> Expiration {
    let wanted = current.plus_days(offset_days);
    listed
        .iter()
        .copied()
        .filter(|e| *e >= wanted)
        .min()
        .unwrap_or(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::OptionDetails;
    use crate::domain::shared::Symbol;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn exp(y: i32, m: u32, d: u32) -> Expiration {
        Expiration::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn chain(strikes: &[Decimal]) -> Vec<OptionQuote> {
        strikes
            .iter()
            .map(|s| OptionQuote::new(*s, dec!(1.00), dec!(1.20)))
            .collect()
    }

    fn held_call() -> Position {
        Position::option(
            Symbol::new("AAPL"),
            dec!(-2),
            OptionDetails::new(dec!(160), exp(2025, 1, 17), OptionType::Call)
                .with_quote(dec!(2.10), dec!(2.30)),
        )
    }

    fn query(stock_price: Decimal, otm_pct: Decimal) -> CandidateQuery {
        CandidateQuery {
            stock_price,
            otm_pct,
            target_expiration: exp(2025, 1, 24),
        }
    }

    #[test_case(dec!(150), dec!(10), OptionType::Call, dec!(165) ; "call above price")]
    #[test_case(dec!(200), dec!(5), OptionType::Put, dec!(190) ; "put below price")]
    #[test_case(dec!(100), dec!(0), OptionType::Call, dec!(100) ; "zero otm")]
    fn target_strike_cases(price: Decimal, otm: Decimal, side: OptionType, expected: Decimal) {
        assert_eq!(target_strike(price, otm, side), Some(expected));
    }

    #[test]
    fn target_strike_overflow_is_none() {
        assert_eq!(target_strike(Decimal::MAX, dec!(10), OptionType::Call), None);
    }

    #[test]
    fn unrepresentable_target_has_no_candidate() {
        let quotes = chain(&[dec!(165)]);
        let result = select_candidate(&held_call(), query(Decimal::MAX, dec!(10)), &quotes, None);
        assert!(matches!(result, Err(RolloverError::NoCandidate { .. })));
    }

    #[test]
    fn select_strike_skips_unrepresentable_distance() {
        let quotes = chain(&[Decimal::MAX, dec!(100)]);
        assert_eq!(select_strike(&quotes, dec!(-1)), Some(dec!(100)));
    }

    #[test_case(dec!(102), dec!(100) ; "nearer lower strike")]
    #[test_case(dec!(103.5), dec!(105) ; "nearer upper strike")]
    #[test_case(dec!(102.5), dec!(100) ; "tie keeps first")]
    #[test_case(dec!(1), dec!(95) ; "below range")]
    fn select_strike_cases(target: Decimal, expected: Decimal) {
        let quotes = chain(&[dec!(95), dec!(100), dec!(105)]);
        assert_eq!(select_strike(&quotes, target), Some(expected));
    }

    #[test]
    fn select_strike_skips_missing_strikes() {
        let mut quotes = chain(&[dec!(105)]);
        quotes.insert(0, OptionQuote::default());
        assert_eq!(select_strike(&quotes, dec!(1)), Some(dec!(105)));
        assert_eq!(select_strike(&[OptionQuote::default()], dec!(1)), None);
    }

    #[test]
    fn locate_quote_within_tolerance() {
        let quotes = chain(&[dec!(100.004)]);
        assert!(locate_quote(&quotes, dec!(100), None).is_some());
        assert!(locate_quote(&quotes, dec!(100.02), None).is_none());
    }

    #[test]
    fn locate_quote_respects_expiration() {
        let quotes = vec![
            OptionQuote::new(dec!(165), dec!(1), dec!(1.1)).with_expiration(exp(2025, 1, 17)),
            OptionQuote::new(dec!(165), dec!(2), dec!(2.1)).with_expiration(exp(2025, 1, 24)),
        ];
        let found = locate_quote(&quotes, dec!(165), Some(exp(2025, 1, 24))).unwrap();
        assert_eq!(found.bid, dec!(2));
    }

    #[test]
    fn candidate_exact_strike_match() {
        let quotes = chain(&[dec!(160), dec!(165), dec!(170)]);
        let candidate = select_candidate(&held_call(), query(dec!(150), dec!(10)), &quotes, None)
            .unwrap();
        assert_eq!(candidate.replacement_strike, dec!(165));
        assert_eq!(candidate.target_strike, dec!(165));
        assert_eq!(candidate.target_expiration, exp(2025, 1, 24));
        // (160 - 150) / 150 × 100
        assert_eq!(candidate.distance_to_strike_pct.round_dp(2), dec!(6.67));
    }

    #[test]
    fn candidate_filters_by_expiration_when_unfiltered_fetch() {
        let quotes = vec![
            OptionQuote::new(dec!(165), dec!(1), dec!(1.1)).with_expiration(exp(2025, 1, 17)),
            OptionQuote::new(dec!(170), dec!(2), dec!(2.1)).with_expiration(exp(2025, 1, 24)),
        ];
        let candidate = select_candidate(
            &held_call(),
            query(dec!(150), dec!(10)),
            &quotes,
            Some(exp(2025, 1, 24)),
        )
        .unwrap();
        assert_eq!(candidate.replacement_strike, dec!(170));
    }

    #[test]
    fn empty_chain_has_no_candidate() {
        let result = select_candidate(&held_call(), query(dec!(150), dec!(10)), &[], None);
        assert!(matches!(result, Err(RolloverError::NoCandidate { .. })));
    }

    #[test]
    fn all_invalid_strikes_have_no_candidate() {
        let quotes = vec![OptionQuote::default(), OptionQuote::default()];
        let result = select_candidate(&held_call(), query(dec!(150), dec!(10)), &quotes, None);
        assert!(matches!(result, Err(RolloverError::NoCandidate { .. })));
    }

    #[test]
    fn stock_position_is_not_rollable() {
        let stock = Position::stock(Symbol::new("AAPL"), dec!(100), dec!(150));
        let quotes = chain(&[dec!(165)]);
        let result = select_candidate(&stock, query(dec!(150), dec!(10)), &quotes, None);
        assert!(matches!(result, Err(RolloverError::InvalidPosition(_))));
    }

    #[test]
    fn target_expiration_maps_to_next_listed() {
        let listed = [exp(2025, 1, 17), exp(2025, 1, 31), exp(2025, 1, 24)];
        assert_eq!(
            resolve_target_expiration(exp(2025, 1, 17), &listed, 7),
            exp(2025, 1, 24)
        );
        assert_eq!(
            resolve_target_expiration(exp(2025, 1, 16), &listed, 7),
            exp(2025, 1, 24)
        );
    }

    #[test]
    fn target_expiration_falls_back_to_computed_date() {
        assert_eq!(
            resolve_target_expiration(exp(2025, 1, 17), &[], 7),
            exp(2025, 1, 24)
        );
        assert_eq!(
            resolve_target_expiration(exp(2025, 1, 17), &[exp(2025, 1, 17)], 7),
            exp(2025, 1, 24)
        );
    }
}

//! Numeric helpers for option arithmetic.

use rust_decimal::Decimal;

/// Shares controlled by one equity option contract.
pub const CONTRACT_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// `part / whole × 100`, or zero when `whole` is not positive.
///
/// A quotient too large to represent is also reported as zero.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// `price × 100 × contracts`, or `None` if the product overflows.
#[must_use]
pub fn contract_notional(price: Decimal, contracts: Decimal) -> Option<Decimal> {
    price
        .checked_mul(CONTRACT_MULTIPLIER)?
        .checked_mul(contracts)
}

//! One row of a fetched option chain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Expiration;

/// A single option quote for a ticker/expiration.
///
/// `strike` is `None` when the upstream row carried a missing, non-numeric
/// or NaN strike. Such rows are kept for display but never take part in
/// strike-distance comparisons. Missing prices decode as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price, if the upstream value was usable.
    pub strike: Option<Decimal>,
    /// Expiration date, if reported.
    pub expiration: Option<Expiration>,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Last traded price.
    pub last: Decimal,
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
    /// Implied volatility.
    pub implied_volatility: Option<f64>,
    /// Contracts traded today.
    pub volume: u64,
    /// Open interest.
    pub open_interest: u64,
}

impl OptionQuote {
    /// Create a quote with a strike and bid/ask, everything else defaulted.
    #[must_use]
    pub fn new(strike: Decimal, bid: Decimal, ask: Decimal) -> Self {
        Self {
            strike: Some(strike),
            bid,
            ask,
            ..Self::default()
        }
    }

    /// Set the expiration.
    #[must_use]
    pub const fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the last traded price.
    #[must_use]
    pub const fn with_last(mut self, last: Decimal) -> Self {
        self.last = last;
        self
    }

    /// Whether any price source (bid, ask, last) is positive.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.bid > Decimal::ZERO || self.ask > Decimal::ZERO || self.last > Decimal::ZERO
    }

    /// Ask price, or zero when unpriced.
    #[must_use]
    pub fn ask_or_zero(&self) -> Decimal {
        self.ask.max(Decimal::ZERO)
    }

    /// Bid/ask midpoint, falling back to whichever side is positive.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = (self.bid > Decimal::ZERO).then_some(self.bid);
        let ask = (self.ask > Decimal::ZERO).then_some(self.ask);
        match (bid, ask) {
            (Some(b), Some(a)) => Some(b.checked_add(a).map_or(a, |sum| sum / Decimal::TWO)),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mid_price_uses_both_sides() {
        let quote = OptionQuote::new(dec!(100), dec!(1.20), dec!(1.40));
        assert_eq!(quote.mid_price(), Some(dec!(1.30)));
    }

    #[test]
    fn mid_price_falls_back_to_available_side() {
        assert_eq!(
            OptionQuote::new(dec!(100), Decimal::ZERO, dec!(1.40)).mid_price(),
            Some(dec!(1.40))
        );
        assert_eq!(
            OptionQuote::new(dec!(100), dec!(1.20), Decimal::ZERO).mid_price(),
            Some(dec!(1.20))
        );
        assert_eq!(
            OptionQuote::new(dec!(100), Decimal::ZERO, Decimal::ZERO).mid_price(),
            None
        );
    }

    #[test]
    fn has_price_considers_last() {
        let unpriced = OptionQuote::new(dec!(100), Decimal::ZERO, Decimal::ZERO);
        assert!(!unpriced.has_price());
        assert!(unpriced.with_last(dec!(0.05)).has_price());
    }

    #[test]
    fn negative_ask_counts_as_zero() {
        let quote = OptionQuote::new(dec!(100), Decimal::ZERO, dec!(-1));
        assert_eq!(quote.ask_or_zero(), Decimal::ZERO);
    }
}

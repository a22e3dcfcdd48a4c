//! Per-selection roll session state machine.
//!
//! ```text
//! Idle -> AwaitingExpirations -> ReadyForFetch -> Fetching -> Suggested
//!                                      ^            |            |
//!                                      |            v            v
//!                                      +-------- Error <---- Submitting
//!                                      +------------------------+ (ok)
//! ```
//!
//! The session holds no I/O. The caller performs each backend call and
//! reports its outcome back; the session validates that each step is legal
//! in the current phase.

use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::RolloverError;
use super::services::{build_order_pair, resolve_target_expiration, select_candidate};
use super::value_objects::{CandidateQuery, RolloverCandidate, RolloverOrderPair, RolloverPhase};
use crate::domain::option_chain::{Expiration, OptionQuote, OptionType};
use crate::domain::portfolio::Position;
use crate::domain::shared::Symbol;

/// A candidate together with its ready-to-submit order pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloverSuggestion {
    /// Selected replacement.
    pub candidate: RolloverCandidate,
    /// Orders that perform the roll.
    pub orders: RolloverOrderPair,
}

/// Parameters for the replacement-chain fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Underlying ticker.
    pub symbol: Symbol,
    /// Side of the replacement.
    pub option_type: OptionType,
    /// OTM target in percent.
    pub otm_pct: Decimal,
    /// Expiration to fetch.
    pub expiration: Expiration,
}

/// Roll session for one selected position.
#[derive(Debug, Clone)]
pub struct RolloverSession {
    phase: RolloverPhase,
    held: Option<Position>,
    stock_price: Decimal,
    otm_pct: Decimal,
    default_otm_pct: Decimal,
    offset_days: i64,
    expirations: Vec<Expiration>,
    target_expiration: Option<Expiration>,
    suggestion: Option<RolloverSuggestion>,
    last_error: Option<String>,
}

impl RolloverSession {
    /// Idle session with the default OTM target and expiration offset.
    #[must_use]
    pub const fn new(default_otm_pct: Decimal, offset_days: i64) -> Self {
        Self {
            phase: RolloverPhase::Idle,
            held: None,
            stock_price: Decimal::ZERO,
            otm_pct: default_otm_pct,
            default_otm_pct,
            offset_days,
            expirations: Vec::new(),
            target_expiration: None,
            suggestion: None,
            last_error: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RolloverPhase {
        self.phase
    }

    /// Position being rolled.
    #[must_use]
    pub const fn held(&self) -> Option<&Position> {
        self.held.as_ref()
    }

    /// OTM target in percent.
    #[must_use]
    pub const fn otm_pct(&self) -> Decimal {
        self.otm_pct
    }

    /// Listed expirations, if they loaded.
    #[must_use]
    pub fn expirations(&self) -> &[Expiration] {
        &self.expirations
    }

    /// Expiration the next fetch will use.
    #[must_use]
    pub const fn target_expiration(&self) -> Option<Expiration> {
        self.target_expiration
    }

    /// Most recent suggestion, kept after a successful submit.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&RolloverSuggestion> {
        self.suggestion.as_ref()
    }

    /// Message from the last failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn invalid(&self, action: &'static str) -> RolloverError {
        RolloverError::InvalidTransition {
            from: self.phase,
            action,
        }
    }

    /// Pick a short option to roll.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while a backend call is outstanding and
    /// `InvalidPosition` for anything but a short option.
    pub fn select_position(
        &mut self,
        position: Position,
        stock_price: Decimal,
    ) -> Result<(), RolloverError> {
        if self.phase.is_busy() {
            return Err(self.invalid("select a position"));
        }
        if !position.is_short_option() {
            return Err(RolloverError::InvalidPosition(format!(
                "{} is not a short option",
                position.symbol
            )));
        }
        self.held = Some(position);
        self.stock_price = stock_price;
        self.otm_pct = self.default_otm_pct;
        self.expirations.clear();
        self.target_expiration = None;
        self.suggestion = None;
        self.last_error = None;
        self.phase = RolloverPhase::AwaitingExpirations;
        Ok(())
    }

    /// Record the listed expirations, or `None` if they failed to load.
    ///
    /// Never fails the transition: without a listing the target is the
    /// held expiration plus the offset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless awaiting expirations.
    pub fn expirations_loaded(
        &mut self,
        listed: Option<Vec<Expiration>>,
    ) -> Result<Expiration, RolloverError> {
        if self.phase != RolloverPhase::AwaitingExpirations {
            return Err(self.invalid("load expirations"));
        }
        let current = self
            .held
            .as_ref()
            .and_then(|p| p.option.as_ref())
            .map(|d| d.expiration)
            .ok_or_else(|| self.invalid("load expirations"))?;
        self.expirations = listed.unwrap_or_default();
        let target = resolve_target_expiration(current, &self.expirations, self.offset_days);
        self.target_expiration = Some(target);
        self.phase = RolloverPhase::ReadyForFetch;
        Ok(target)
    }

    /// Change the OTM target before fetching.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while busy or idle.
    pub fn set_otm_pct(&mut self, otm_pct: Decimal) -> Result<(), RolloverError> {
        if self.phase.is_busy() || self.phase == RolloverPhase::Idle {
            return Err(self.invalid("change the OTM target"));
        }
        self.otm_pct = otm_pct;
        Ok(())
    }

    /// Change the target expiration before fetching.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while busy or idle.
    pub fn set_target_expiration(&mut self, expiration: Expiration) -> Result<(), RolloverError> {
        if self.phase.is_busy() || self.phase == RolloverPhase::Idle {
            return Err(self.invalid("change the expiration"));
        }
        self.target_expiration = Some(expiration);
        Ok(())
    }

    /// Start fetching the replacement chain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless ready for a fetch or showing a
    /// suggestion.
    pub fn begin_fetch(&mut self) -> Result<FetchRequest, RolloverError> {
        if !matches!(
            self.phase,
            RolloverPhase::ReadyForFetch | RolloverPhase::Suggested
        ) {
            return Err(self.invalid("fetch suggestions"));
        }
        let (Some(held), Some(expiration)) = (self.held.as_ref(), self.target_expiration) else {
            return Err(self.invalid("fetch suggestions"));
        };
        let Some(details) = held.option.as_ref() else {
            return Err(self.invalid("fetch suggestions"));
        };
        let request = FetchRequest {
            symbol: held.symbol.clone(),
            option_type: details.option_type,
            otm_pct: self.otm_pct,
            expiration,
        };
        self.phase = RolloverPhase::Fetching;
        Ok(request)
    }

    /// Feed the fetched chain and select a candidate.
    ///
    /// A positive `stock_price` replaces the price given at selection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless fetching. Selection and
    /// construction errors move the session to `Error` and are returned.
    pub fn fetch_succeeded(
        &mut self,
        stock_price: Option<Decimal>,
        chain: &[OptionQuote],
    ) -> Result<&RolloverSuggestion, RolloverError> {
        if self.phase != RolloverPhase::Fetching {
            return Err(self.invalid("accept a chain"));
        }
        if let Some(price) = stock_price.filter(|p| *p > Decimal::ZERO) {
            self.stock_price = price;
        }
        match self.suggest(chain) {
            Ok(suggestion) => {
                self.last_error = None;
                self.phase = RolloverPhase::Suggested;
                Ok(self.suggestion.insert(suggestion))
            }
            Err(err) => {
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    fn suggest(&self, chain: &[OptionQuote]) -> Result<RolloverSuggestion, RolloverError> {
        let (Some(held), Some(target_expiration)) = (self.held.as_ref(), self.target_expiration)
        else {
            return Err(self.invalid("accept a chain"));
        };
        let query = CandidateQuery {
            stock_price: self.stock_price,
            otm_pct: self.otm_pct,
            target_expiration,
        };
        let candidate = select_candidate(held, query, chain, Some(target_expiration))?;
        let orders = build_order_pair(&candidate)?;
        Ok(RolloverSuggestion { candidate, orders })
    }

    /// Record a failed chain fetch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless fetching.
    pub fn fetch_failed(&mut self, reason: impl Into<String>) -> Result<(), RolloverError> {
        if self.phase != RolloverPhase::Fetching {
            return Err(self.invalid("fail a fetch"));
        }
        self.fail(reason.into());
        Ok(())
    }

    /// Start submitting the suggested order pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless a suggestion is showing.
    pub fn begin_submit(&mut self) -> Result<RolloverOrderPair, RolloverError> {
        if self.phase != RolloverPhase::Suggested {
            return Err(self.invalid("submit"));
        }
        let orders = self
            .suggestion
            .as_ref()
            .map(|s| s.orders.clone())
            .ok_or_else(|| self.invalid("submit"))?;
        self.phase = RolloverPhase::Submitting;
        Ok(orders)
    }

    /// Record a successful submit; the suggestion stays for display.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless submitting.
    pub fn submit_succeeded(&mut self) -> Result<(), RolloverError> {
        if self.phase != RolloverPhase::Submitting {
            return Err(self.invalid("complete a submit"));
        }
        self.phase = RolloverPhase::ReadyForFetch;
        Ok(())
    }

    /// Record a failed submit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless submitting.
    pub fn submit_failed(&mut self, reason: impl Into<String>) -> Result<(), RolloverError> {
        if self.phase != RolloverPhase::Submitting {
            return Err(self.invalid("fail a submit"));
        }
        self.fail(reason.into());
        Ok(())
    }

    /// Leave the error state so the user can fetch again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless in error.
    pub fn retry(&mut self) -> Result<(), RolloverError> {
        if self.phase != RolloverPhase::Error {
            return Err(self.invalid("retry"));
        }
        self.phase = RolloverPhase::ReadyForFetch;
        Ok(())
    }

    /// Drop the selection and return to idle.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_otm_pct, self.offset_days);
    }

    fn fail(&mut self, reason: String) {
        self.last_error = Some(reason);
        self.phase = RolloverPhase::Error;
    }
}

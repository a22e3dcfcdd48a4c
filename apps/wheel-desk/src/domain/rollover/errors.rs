//! Rollover errors.

use thiserror::Error;

use super::value_objects::RolloverPhase;

/// Which leg of a roll an error refers to.
pub type LegName = &'static str;

/// Errors raised while selecting or building a roll.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RolloverError {
    /// The fetched chain holds no usable replacement contract.
    #[error("No rollover candidate: {reason}")]
    NoCandidate {
        /// What was missing.
        reason: String,
    },

    /// A leg has no positive bid, ask or last price.
    #[error("Missing price data for the {leg} leg")]
    PriceIntegrity {
        /// `buy_to_close` or `sell_to_open`.
        leg: LegName,
    },

    /// The selected position cannot be rolled.
    #[error("Position cannot be rolled: {0}")]
    InvalidPosition(String),

    /// The session is not in a state that allows the action.
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// Current phase.
        from: RolloverPhase,
        /// Attempted action.
        action: &'static str,
    },
}

impl RolloverError {
    /// Build a `NoCandidate` error.
    #[must_use]
    pub fn no_candidate(reason: impl Into<String>) -> Self {
        Self::NoCandidate {
            reason: reason.into(),
        }
    }
}

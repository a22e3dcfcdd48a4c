//! Roll session phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a roll session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverPhase {
    /// No position selected.
    #[default]
    Idle,
    /// Position selected, listed expirations being fetched.
    AwaitingExpirations,
    /// Target expiration known, waiting for a fetch.
    ReadyForFetch,
    /// Replacement chain being fetched.
    Fetching,
    /// A candidate and order pair are available.
    Suggested,
    /// Order pair being submitted.
    Submitting,
    /// The last fetch or submit failed.
    Error,
}

impl RolloverPhase {
    /// Returns true while a backend call is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::AwaitingExpirations | Self::Fetching | Self::Submitting
        )
    }
}

impl fmt::Display for RolloverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingExpirations => "awaiting expirations",
            Self::ReadyForFetch => "ready for fetch",
            Self::Fetching => "fetching",
            Self::Suggested => "suggested",
            Self::Submitting => "submitting",
            Self::Error => "in error",
        };
        f.write_str(name)
    }
}

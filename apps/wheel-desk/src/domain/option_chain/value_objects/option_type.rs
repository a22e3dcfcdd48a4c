//! Call/put option type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// Option type (call or put).
///
/// The backend and broker feeds spell this several ways ("C", "CALL",
/// "Call", "call", ...). Everything is normalized into this enum when a
/// response is decoded; nothing downstream branches on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionType {
    /// Parse any of the accepted spellings.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "C" | "CALL" | "CALLS" => Some(Self::Call),
            "P" | "PUT" | "PUTS" => Some(Self::Put),
            _ => None,
        }
    }

    /// Canonical wire spelling ("CALL" / "PUT").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            DomainError::invalid_value("option_type", format!("unknown option type '{s}'"))
        })
    }
}

//! Ticker symbol value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// An underlying ticker symbol such as "AAPL".
///
/// Normalized to trimmed uppercase so that lookups keyed by ticker are
/// insensitive to how the user or the backend spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Parse user input, rejecting empty or malformed tickers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the ticker is empty or contains
    /// characters other than letters, digits, `.` and `-`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let symbol = Self::new(value);
        if symbol.0.is_empty() {
            return Err(DomainError::invalid_value("ticker", "ticker is empty"));
        }
        if !symbol
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(DomainError::invalid_value(
                "ticker",
                format!("'{}' is not a valid ticker", symbol.0),
            ));
        }
        Ok(symbol)
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

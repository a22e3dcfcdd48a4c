//! Option expiration date value object.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

const COMPACT_FORMAT: &str = "%Y%m%d";
const DASHED_FORMAT: &str = "%Y-%m-%d";

/// An option expiration date.
///
/// The backend speaks `YYYYMMDD`; labels and some broker feeds use
/// `YYYY-MM-DD`. Both parse; the compact form is the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expiration(NaiveDate);

impl Expiration {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse `YYYYMMDD` or `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` for anything else.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, COMPACT_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, DASHED_FORMAT))
            .map(Self)
            .map_err(|_| {
                DomainError::invalid_value("expiration", format!("unparseable date '{value}'"))
            })
    }

    /// The calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Same expiration shifted by whole calendar days.
    #[must_use]
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Wire form, `YYYYMMDD`.
    #[must_use]
    pub fn compact(&self) -> String {
        self.0.format(COMPACT_FORMAT).to_string()
    }

    /// Display form, `YYYY-MM-DD`.
    #[must_use]
    pub fn label(&self) -> String {
        self.0.format(DASHED_FORMAT).to_string()
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(COMPACT_FORMAT))
    }
}

impl FromStr for Expiration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Expiration {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.compact())
    }
}

impl<'de> Deserialize<'de> for Expiration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A listed expiration as offered by the backend's expiration picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationDescriptor {
    /// Expiration date.
    pub value: Expiration,
    /// Human-readable label.
    pub label: String,
}

impl ExpirationDescriptor {
    /// Build a descriptor with the default dashed label.
    #[must_use]
    pub fn new(value: Expiration) -> Self {
        Self {
            label: value.label(),
            value,
        }
    }
}

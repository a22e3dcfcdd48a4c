//! Order status as stored by the backend.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a backend order.
///
/// `Pending` and `Processing` are the only non-terminal states; the status
/// poller runs while any order is in one of them. Statuses the client does
/// not recognise are kept verbatim as `Unknown` and treated as terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum OrderStatus {
    /// Saved, not yet sent to the broker.
    Pending,
    /// Sent to the broker, awaiting a fill.
    Processing,
    /// Executed by the broker.
    Executed,
    /// Filled by the broker.
    Filled,
    /// Completed.
    Completed,
    /// Canceled by the user.
    Canceled,
    /// Rejected by the broker.
    Rejected,
    /// Failed while executing.
    Error,
    /// Unrecognised status string.
    Unknown(String),
}

impl OrderStatus {
    /// Parse a backend status string (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" | "submitted" => Self::Processing,
            "executed" => Self::Executed,
            "filled" => Self::Filled,
            "completed" => Self::Completed,
            "canceled" | "cancelled" => Self::Canceled,
            "rejected" => Self::Rejected,
            "error" | "failed" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Executed => "executed",
            Self::Filled => "filled",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Rejected => "rejected",
            Self::Error => "error",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true once the order can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Processing)
    }

    /// Returns true if the order quantity may still be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

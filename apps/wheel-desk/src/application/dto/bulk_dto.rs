//! Bulk operation outcome.

use serde::{Deserialize, Serialize};

/// Why one item of a bulk operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Item identifier (ticker or order id).
    pub item: String,
    /// Error message.
    pub error: String,
}

/// Success and failure counts for a sequential bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Items that succeeded.
    pub succeeded: usize,
    /// Items that failed.
    pub failed: usize,
    /// Per-item failures, in processing order.
    pub failures: Vec<ItemFailure>,
}

impl BulkOutcome {
    /// Record a success.
    pub const fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failure.
    pub fn record_failure(&mut self, item: impl Into<String>, error: impl ToString) {
        self.failed += 1;
        self.failures.push(ItemFailure {
            item: item.into(),
            error: error.to_string(),
        });
    }

    /// Items processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

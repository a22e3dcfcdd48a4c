//! Order drafts and backend-tracked orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::OrderTrackingError;
use super::value_objects::{OrderAction, OrderStatus, OrderType};
use crate::domain::option_chain::{Expiration, OptionQuote, OptionType};
use crate::domain::shared::{OrderId, Symbol};

/// Projected earnings attached to an opportunity order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EarningsMetadata {
    /// Contracts the position supports.
    pub max_contracts: u32,
    /// Premium collected per contract (ask × 100).
    pub premium_per_contract: Decimal,
    /// Premium across all contracts.
    pub total_premium: Decimal,
    /// Premium over put exercise cost, as a percentage.
    pub return_on_cash: Decimal,
    /// Premium over covered stock value, as a percentage.
    pub return_on_capital: Decimal,
}

/// A single order the client asks the backend to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Underlying ticker.
    pub ticker: Symbol,
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub action: OrderAction,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
    /// Contracts.
    pub quantity: u32,
    /// Pricing type.
    pub order_type: OrderType,
    /// Premium per share.
    pub premium: Decimal,
    /// Quote snapshot the order was drafted from.
    pub quote: OptionQuote,
    /// Projected earnings, for opportunity orders.
    pub earnings: Option<EarningsMetadata>,
}

/// An order as tracked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Backend identifier.
    pub id: OrderId,
    /// Underlying ticker.
    pub ticker: Symbol,
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub action: OrderAction,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
    /// Contracts.
    pub quantity: u32,
    /// Premium per share, if recorded.
    pub premium: Option<Decimal>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Whether the broker executed it.
    pub executed: bool,
    /// Whether it is one leg of a rollover pair.
    pub is_rollover: bool,
    /// Creation timestamp as reported.
    pub timestamp: Option<String>,
}

impl PendingOrder {
    /// Check that `quantity` may be applied to this order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero and `NotEditable` when the order
    /// has left the pending state.
    pub fn ensure_quantity_editable(&self, quantity: u32) -> Result<(), OrderTrackingError> {
        if quantity == 0 {
            return Err(OrderTrackingError::InvalidQuantity { quantity });
        }
        if !self.status.is_editable() {
            return Err(OrderTrackingError::NotEditable {
                order_id: self.id,
                status: self.status.clone(),
            });
        }
        Ok(())
    }
}

/// Whether any order is still awaiting a terminal status.
#[must_use]
pub fn has_active_orders(orders: &[PendingOrder]) -> bool {
    orders.iter().any(|o| !o.status.is_terminal())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    pub fn pending_order(id: i64, status: OrderStatus) -> PendingOrder {
        PendingOrder {
            id: OrderId::new(id),
            ticker: Symbol::new("AAPL"),
            option_type: OptionType::Call,
            action: OrderAction::Sell,
            strike: dec!(165),
            expiration: Expiration::new(NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()),
            quantity: 3,
            premium: Some(dec!(1.25)),
            status,
            executed: false,
            is_rollover: false,
            timestamp: None,
        }
    }
}

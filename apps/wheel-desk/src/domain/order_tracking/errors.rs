//! Order tracking errors.

use thiserror::Error;

use super::value_objects::OrderStatus;
use crate::domain::shared::OrderId;

/// Errors raised by client-side order checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderTrackingError {
    /// Quantity must be a positive contract count.
    #[error("Invalid quantity {quantity}: must be greater than zero")]
    InvalidQuantity {
        /// Quantity requested.
        quantity: u32,
    },

    /// Only pending orders can be edited.
    #[error("Order {order_id} is {status} and can no longer be edited")]
    NotEditable {
        /// Order identifier.
        order_id: OrderId,
        /// Current status.
        status: OrderStatus,
    },

    /// Order was not among the known orders.
    #[error("Order {0} not found")]
    NotFound(OrderId),
}

//! Order tracking value objects.

mod order_action;
mod order_status;

pub use order_action::{OrderAction, OrderType};
pub use order_status::OrderStatus;

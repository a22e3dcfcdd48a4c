//! Order Tracking Bounded Context
//!
//! Orders persisted by the assistant backend: drafts the client saves,
//! pending/executed orders it lists, and the status vocabulary the
//! status poller reconciles against.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::{EarningsMetadata, OrderDraft, PendingOrder, has_active_orders};
pub use errors::OrderTrackingError;
pub use value_objects::{OrderAction, OrderStatus, OrderType};

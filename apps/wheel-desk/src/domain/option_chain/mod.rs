//! Option Chain Bounded Context
//!
//! Market-side option data as the assistant backend reports it:
//! - Normalized call/put type
//! - Chain quotes with prices and Greeks
//! - Listed expirations and the weekly/monthly expiration calendar

pub mod calendar;
pub mod value_objects;

pub use calendar::{closest_friday, next_monthly_expiration};
pub use value_objects::{Expiration, ExpirationDescriptor, OptionQuote, OptionType};

//! Option chain value objects.

mod expiration;
mod option_quote;
mod option_type;

pub use expiration::{Expiration, ExpirationDescriptor};
pub use option_quote::OptionQuote;
pub use option_type::OptionType;

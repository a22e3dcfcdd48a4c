//! Portfolio Bounded Context
//!
//! Read-only broker account data: stock and option positions, the account
//! balance snapshot, and the income expected from short options expiring
//! this week.

mod account;
mod income;
mod position;

pub use account::PortfolioAccount;
pub use income::{WeeklyIncome, WeeklyIncomeLine, weekly_option_income};
pub use position::{OptionDetails, Position, SecurityType};

//! Allocation value objects.

mod earnings_summary;
mod ticker_settings;
mod ticker_snapshot;

pub use earnings_summary::{ContractSizing, EarningsSummary, TickerEarnings, WEEKS_PER_YEAR};
pub use ticker_settings::TickerSettings;
pub use ticker_snapshot::TickerSnapshot;

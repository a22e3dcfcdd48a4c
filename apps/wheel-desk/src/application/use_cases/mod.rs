//! Application Use Cases
//!
//! Each use case orchestrates the session and one driven port.

mod manage_orders;
mod manage_tickers;
mod refresh_tickers;
mod roll_option;
mod submit_orders;

pub use manage_orders::{ManageOrdersUseCase, OrderOpsError};
pub use manage_tickers::{ManageTickersUseCase, TickerError};
pub use refresh_tickers::{RefreshError, RefreshTickersUseCase};
pub use roll_option::{RollOptionError, RollOptionUseCase};
pub use submit_orders::SubmitOrdersUseCase;

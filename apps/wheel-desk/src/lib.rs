// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Wheel Desk - Rust Core Library
//!
//! Client engine for a wheel-strategy options assistant: sell covered calls
//! on held shares and cash-secured puts on cash, then roll short options
//! forward before they expire.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `allocation`: earnings summary across tickers (the allocation engine)
//!   - `rollover`: replacement selection, order pairs, roll session
//!   - `option_chain`, `portfolio`, `order_tracking`: backend data types
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `WheelBackendPort`, `SettingsStorePort`
//!   - `services`: `DashboardSession`, `OrderStatusPoller`
//!   - `use_cases`: refresh, roll, submit, order and ticker management
//!
//! - **Infrastructure**: Adapters
//!   - `backend`: HTTP adapter for the assistant backend
//!   - `persistence`: JSON settings file
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Ambient
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::allocation::{EarningsSummary, TickerSettings, TickerSnapshot, compute_summary};
pub use domain::option_chain::{Expiration, OptionQuote, OptionType};
pub use domain::portfolio::{PortfolioAccount, Position};
pub use domain::rollover::{RolloverCandidate, RolloverOrderPair, RolloverSession};
pub use domain::shared::{OrderId, Symbol};

// Application re-exports
pub use application::ports::{BackendError, SettingsStorePort, WheelBackendPort};
pub use application::services::{DashboardSession, OrderStatusPoller};

// Infrastructure re-exports
pub use infrastructure::backend::{BackendHttpConfig, HttpWheelBackend};
pub use infrastructure::config::{AppContainer, HttpContainer};
pub use infrastructure::persistence::JsonSettingsStore;

//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the desk depends on:
//! - **Backend**: account data, option chains and order persistence over HTTP
//! - **Settings Store**: durable per-ticker settings and ticker lists

mod backend_port;
#[cfg(test)]
pub(crate) mod mock_backend;
mod settings_store_port;

pub use backend_port::{
    BackendError, ChainQuery, OrderQuery, RolloverReceipt, TickerChain, WheelBackendPort,
};
pub use settings_store_port::{
    InMemorySettingsStore, PersistedSettings, SettingsStoreError, SettingsStorePort,
};

//! Persistence Adapters
//!
//! Durable storage for client-local settings.

pub mod json_settings_store;

pub use json_settings_store::JsonSettingsStore;

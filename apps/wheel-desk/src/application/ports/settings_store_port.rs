//! Settings Store Port (Driven Port)
//!
//! Durable client-local state: per-ticker settings, custom tickers and
//! excluded portfolio tickers.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::domain::allocation::TickerSettings;
use crate::domain::shared::Symbol;

/// Everything the desk persists between runs, keyed by ticker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedSettings {
    /// Per-ticker OTM targets and put quantity.
    #[serde(default)]
    pub ticker_settings: BTreeMap<Symbol, TickerSettings>,
    /// User-added tickers with no shares.
    #[serde(default)]
    pub custom_tickers: BTreeSet<Symbol>,
    /// Portfolio tickers hidden from the opportunity view.
    #[serde(default)]
    pub excluded_tickers: BTreeSet<Symbol>,
}

/// Settings store error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsStoreError {
    /// Reading or writing the backing file failed.
    #[error("Settings I/O error at '{path}': {source}")]
    Io {
        /// Backing file.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The stored document could not be (de)serialized.
    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Port for persisted settings.
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    /// Load the stored settings, or defaults if nothing is stored yet.
    async fn load(&self) -> Result<PersistedSettings, SettingsStoreError>;

    /// Replace the stored settings.
    async fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsStoreError>;
}

/// In-memory settings store (for testing and one-shot runs).
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<PersistedSettings>,
}

impl InMemorySettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `settings`.
    #[must_use]
    pub fn with_settings(settings: PersistedSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Current contents.
    #[must_use]
    pub fn snapshot(&self) -> PersistedSettings {
        self.settings.read().clone()
    }
}

#[async_trait]
impl SettingsStorePort for InMemorySettingsStore {
    async fn load(&self) -> Result<PersistedSettings, SettingsStoreError> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsStoreError> {
        *self.settings.write() = settings.clone();
        Ok(())
    }
}

//! Manage Tickers Use Case
//!
//! Custom and excluded tickers plus per-ticker settings. Every change is
//! written to the settings store before returning.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{SettingsStoreError, SettingsStorePort};
use crate::application::services::{DashboardSession, SessionError};
use crate::domain::allocation::TickerSettings;
use crate::domain::shared::Symbol;

/// Errors from ticker management.
#[derive(Debug, Error)]
pub enum TickerError {
    /// Rejected by the session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The change was applied but could not be persisted.
    #[error(transparent)]
    Store(#[from] SettingsStoreError),
}

/// Use case for editing the tracked ticker set.
pub struct ManageTickersUseCase<S>
where
    S: SettingsStorePort,
{
    store: Arc<S>,
    session: Arc<DashboardSession>,
}

impl<S> ManageTickersUseCase<S>
where
    S: SettingsStorePort,
{
    /// Create a new ManageTickersUseCase.
    pub const fn new(store: Arc<S>, session: Arc<DashboardSession>) -> Self {
        Self { store, session }
    }

    /// Track a user ticker with no shares.
    ///
    /// # Errors
    ///
    /// Returns `Session` for a blank or already tracked symbol.
    pub async fn add_custom(&self, raw: &str) -> Result<Symbol, TickerError> {
        let symbol = Symbol::parse(raw).map_err(SessionError::from)?;
        self.session.add_custom(symbol.clone())?;
        self.persist().await?;
        tracing::info!(symbol = %symbol, "Custom ticker added");
        Ok(symbol)
    }

    /// Stop tracking a user ticker.
    ///
    /// # Errors
    ///
    /// Returns `Session` if it is not a custom ticker.
    pub async fn remove_custom(&self, symbol: &Symbol) -> Result<(), TickerError> {
        self.session.remove_custom(symbol)?;
        self.persist().await
    }

    /// Hide a portfolio ticker.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the change cannot be persisted.
    pub async fn exclude(&self, symbol: Symbol) -> Result<(), TickerError> {
        self.session.exclude(symbol);
        self.persist().await
    }

    /// Show an excluded ticker again.
    ///
    /// # Errors
    ///
    /// Returns `Session` if it was not excluded.
    pub async fn include(&self, symbol: &Symbol) -> Result<(), TickerError> {
        self.session.include(symbol)?;
        self.persist().await
    }

    /// Replace a ticker's OTM targets and put quantity.
    ///
    /// # Errors
    ///
    /// Returns `Session` for out-of-range settings.
    pub async fn update_settings(
        &self,
        symbol: &Symbol,
        settings: TickerSettings,
    ) -> Result<(), TickerError> {
        self.session.update_settings(symbol, settings)?;
        self.persist().await
    }

    async fn persist(&self) -> Result<(), TickerError> {
        self.store.save(&self.session.persisted()).await?;
        Ok(())
    }
}

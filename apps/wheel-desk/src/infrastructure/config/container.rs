//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{SettingsStoreError, SettingsStorePort, WheelBackendPort};
use crate::application::services::{DashboardSession, OrderStatusPoller, PollerConfig};
use crate::application::use_cases::{
    ManageOrdersUseCase, ManageTickersUseCase, RefreshTickersUseCase, RollOptionUseCase,
    SubmitOrdersUseCase,
};
use crate::config::Config;
use crate::infrastructure::backend::{BackendHttpError, HttpWheelBackend};
use crate::infrastructure::persistence::JsonSettingsStore;

/// Container wiring errors.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The backend client could not be built.
    #[error("Backend client setup failed: {0}")]
    Backend(#[from] BackendHttpError),

    /// Persisted settings could not be loaded.
    #[error("Settings could not be loaded: {0}")]
    Settings(#[from] SettingsStoreError),
}

/// Container with the production adapters.
pub type HttpContainer = AppContainer<HttpWheelBackend, JsonSettingsStore>;

/// Dependency injection container.
///
/// Owns the ports, the dashboard session and the order status poller, and
/// hands out use cases sharing them.
pub struct AppContainer<B, S>
where
    B: WheelBackendPort + 'static,
    S: SettingsStorePort + 'static,
{
    // Ports
    backend: Arc<B>,
    store: Arc<S>,
    // Shared state
    session: Arc<DashboardSession>,
    poller: Arc<OrderStatusPoller<B>>,
    bulk_delay: Duration,
}

impl<B, S> AppContainer<B, S>
where
    B: WheelBackendPort + 'static,
    S: SettingsStorePort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        backend: Arc<B>,
        store: Arc<S>,
        session: Arc<DashboardSession>,
        poller_config: PollerConfig,
        bulk_delay: Duration,
    ) -> Self {
        let poller = Arc::new(OrderStatusPoller::new(Arc::clone(&backend), poller_config));
        Self {
            backend,
            store,
            session,
            poller,
            bulk_delay,
        }
    }

    /// Get the backend port.
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Get the settings store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Get the dashboard session.
    pub fn session(&self) -> Arc<DashboardSession> {
        Arc::clone(&self.session)
    }

    /// Get the order status poller.
    pub fn poller(&self) -> Arc<OrderStatusPoller<B>> {
        Arc::clone(&self.poller)
    }

    /// Create a `RefreshTickersUseCase`.
    pub fn refresh_tickers_use_case(&self) -> RefreshTickersUseCase<B> {
        RefreshTickersUseCase::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.session),
            self.bulk_delay,
        )
    }

    /// Create a `RollOptionUseCase`.
    pub fn roll_option_use_case(&self) -> RollOptionUseCase<B> {
        RollOptionUseCase::new(Arc::clone(&self.backend), Arc::clone(&self.session))
    }

    /// Create a `SubmitOrdersUseCase`.
    pub fn submit_orders_use_case(&self) -> SubmitOrdersUseCase<B> {
        SubmitOrdersUseCase::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.session),
            self.bulk_delay,
        )
    }

    /// Create a `ManageOrdersUseCase`.
    pub fn manage_orders_use_case(&self) -> ManageOrdersUseCase<B> {
        ManageOrdersUseCase::new(Arc::clone(&self.backend))
    }

    /// Create a `ManageTickersUseCase`.
    pub fn manage_tickers_use_case(&self) -> ManageTickersUseCase<S> {
        ManageTickersUseCase::new(Arc::clone(&self.store), Arc::clone(&self.session))
    }
}

impl HttpContainer {
    /// Build the production container: HTTP backend, JSON settings file and
    /// a session restored from it.
    pub async fn from_config(config: &Config) -> Result<Self, ContainerError> {
        let backend = Arc::new(HttpWheelBackend::new(&config.backend.to_http_config())?);
        let store = Arc::new(JsonSettingsStore::new(&config.storage.settings_path));
        let persisted = store.load().await?;

        tracing::info!(
            base_url = %config.backend.base_url,
            settings_path = %config.storage.settings_path,
            custom_tickers = persisted.custom_tickers.len(),
            "Container initialized"
        );

        let session = Arc::new(DashboardSession::restore(
            config.session.to_defaults(),
            persisted,
        ));
        Ok(Self::new(
            backend,
            store,
            session,
            config.session.poller_config(),
            config.session.bulk_delay(),
        ))
    }
}

//! Order Status Poller
//!
//! Periodically asks the backend to reconcile order statuses while any
//! order is pending or processing. The controller starts it after
//! submitting orders; it stops on its own once every order is terminal, or
//! when cancelled.
//!
//! Ticks never overlap: each tick awaits its backend calls before the next
//! one is taken, and missed ticks are skipped rather than bunched.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{BackendError, OrderQuery, WheelBackendPort};
use crate::domain::order_tracking::{PendingOrder, has_active_orders};

/// Poller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between polls.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
struct PollTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Cancellable order status polling task.
#[derive(Debug)]
pub struct OrderStatusPoller<B>
where
    B: WheelBackendPort + 'static,
{
    backend: Arc<B>,
    config: PollerConfig,
    task: Mutex<Option<PollTask>>,
    updates: broadcast::Sender<Vec<PendingOrder>>,
}

impl<B> OrderStatusPoller<B>
where
    B: WheelBackendPort + 'static,
{
    /// Create a stopped poller.
    #[must_use]
    pub fn new(backend: Arc<B>, config: PollerConfig) -> Self {
        let (updates, _) = broadcast::channel(32);
        Self {
            backend,
            config,
            task: Mutex::new(None),
            updates,
        }
    }

    /// Receive each batch of orders whose status changed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<PendingOrder>> {
        self.updates.subscribe()
    }

    /// Returns true while the polling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Start polling unless already running. Returns true if a new task was
    /// spawned.
    pub fn ensure_started(&self) -> bool {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return false;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.backend),
            self.config.interval,
            token.clone(),
            self.updates.clone(),
        ));
        *task = Some(PollTask { token, handle });
        tracing::info!(interval = ?self.config.interval, "Order status polling started");
        true
    }

    /// Cancel polling. Safe to call when not running.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.token.cancel();
            tracing::info!("Order status polling stopped");
        }
    }

    /// Wait for the current polling task to finish.
    pub async fn stopped(&self) {
        let handle = self.task.lock().take().map(|t| t.handle);
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "Order status poller task failed");
        }
    }
}

impl<B> Drop for OrderStatusPoller<B>
where
    B: WheelBackendPort + 'static,
{
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.token.cancel();
        }
    }
}

/// One reconciliation step: changed orders and whether any remain active.
async fn poll_once<B>(backend: &B) -> Result<(Vec<PendingOrder>, bool), BackendError>
where
    B: WheelBackendPort,
{
    let updated = backend.check_orders().await?;
    let open = backend.get_orders(OrderQuery::pending()).await?;
    Ok((updated, has_active_orders(&open)))
}

async fn poll_loop<B>(
    backend: Arc<B>,
    interval: Duration,
    shutdown: CancellationToken,
    updates: broadcast::Sender<Vec<PendingOrder>>,
) where
    B: WheelBackendPort + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match poll_once(backend.as_ref()).await {
                    Ok((updated, active)) => {
                        if !updated.is_empty() {
                            tracing::info!(count = updated.len(), "Order statuses updated");
                            let _ = updates.send(updated);
                        }
                        if !active {
                            tracing::info!("No pending orders remain, polling finished");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Order status poll failed");
                    }
                }
            }
            () = shutdown.cancelled() => {
                tracing::debug!("Order status poller shutting down");
                break;
            }
        }
    }
}

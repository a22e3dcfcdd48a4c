//! Submit Orders Use Case
//!
//! Bulk order actions: save the current opportunity orders and execute
//! every pending order. Items are processed one at a time with a delay
//! between backend calls; a failed item never aborts the rest.

use std::sync::Arc;
use std::time::Duration;

use super::manage_orders::OrderOpsError;
use crate::application::dto::BulkOutcome;
use crate::application::ports::{OrderQuery, WheelBackendPort};
use crate::application::services::{DashboardSession, SessionAction};
use crate::domain::allocation::{contract_sizing, opportunity_order};
use crate::domain::option_chain::OptionType;
use crate::domain::order_tracking::OrderStatus;

/// Use case for bulk order submission.
pub struct SubmitOrdersUseCase<B>
where
    B: WheelBackendPort,
{
    backend: Arc<B>,
    session: Arc<DashboardSession>,
    delay: Duration,
}

impl<B> SubmitOrdersUseCase<B>
where
    B: WheelBackendPort,
{
    /// Create a new use case; `delay` separates bulk items.
    pub const fn new(backend: Arc<B>, session: Arc<DashboardSession>, delay: Duration) -> Self {
        Self {
            backend,
            session,
            delay,
        }
    }

    /// Save a SELL order for every ticker showing an opportunity on `side`.
    ///
    /// Tickers that support no contracts on that side are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Session` if a bulk save is already running.
    pub async fn save_opportunities(&self, side: OptionType) -> Result<BulkOutcome, OrderOpsError> {
        let _guard = self.session.begin(SessionAction::SaveOpportunities)?;
        let mut outcome = BulkOutcome::default();
        let mut first = true;

        for snapshot in self.session.snapshots() {
            let sizing = contract_sizing(&snapshot);
            let contracts = match side {
                OptionType::Call => sizing.call_contracts,
                OptionType::Put => sizing.put_contracts,
            };
            if !sizing.participates || contracts.is_zero() {
                continue;
            }

            let draft = match opportunity_order(&snapshot, side) {
                Ok(draft) => draft,
                Err(e) => {
                    outcome.record_failure(snapshot.symbol.as_str(), e);
                    continue;
                }
            };

            if !first {
                tokio::time::sleep(self.delay).await;
            }
            first = false;

            match self.backend.save_order(&draft).await {
                Ok(id) => {
                    tracing::info!(
                        order_id = %id,
                        symbol = %draft.ticker,
                        side = %side,
                        quantity = draft.quantity,
                        "Opportunity order saved"
                    );
                    outcome.record_success();
                }
                Err(e) => {
                    tracing::warn!(symbol = %draft.ticker, error = %e, "Order save failed");
                    outcome.record_failure(draft.ticker.as_str(), e);
                }
            }
        }
        Ok(outcome)
    }

    /// Execute every order still in the `pending` status, in listing order.
    ///
    /// # Errors
    ///
    /// Returns `Session` if execution is already running and `Backend` if
    /// the pending orders cannot be listed.
    pub async fn execute_all(&self) -> Result<BulkOutcome, OrderOpsError> {
        let _guard = self.session.begin(SessionAction::ExecuteAll)?;
        let orders = self.backend.get_orders(OrderQuery::pending()).await?;
        let mut outcome = BulkOutcome::default();

        let pending = orders.iter().filter(|o| o.status == OrderStatus::Pending);
        for (index, order) in pending.enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }
            match self.backend.execute_order(order.id).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::warn!(order_id = %order.id, error = %e, "Order execution failed");
                    outcome.record_failure(order.id.to_string(), e);
                }
            }
        }

        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Execute all complete"
        );
        Ok(outcome)
    }
}

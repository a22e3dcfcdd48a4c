//! Manage Orders Use Case
//!
//! Listing, cancelling, deleting and resizing saved orders.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{BackendError, OrderQuery, WheelBackendPort};
use crate::application::services::SessionError;
use crate::domain::order_tracking::{OrderTrackingError, PendingOrder};
use crate::domain::shared::OrderId;

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderOpsError {
    /// Rejected client-side before any call.
    #[error(transparent)]
    Tracking(#[from] OrderTrackingError),

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Rejected by the session.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Use case for managing saved orders.
pub struct ManageOrdersUseCase<B>
where
    B: WheelBackendPort,
{
    backend: Arc<B>,
}

impl<B> ManageOrdersUseCase<B>
where
    B: WheelBackendPort,
{
    /// Create a new ManageOrdersUseCase.
    pub const fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// List orders matching a query.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the listing fails.
    pub async fn list(&self, query: OrderQuery) -> Result<Vec<PendingOrder>, OrderOpsError> {
        Ok(self.backend.get_orders(query).await?)
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the backend rejects the cancel.
    pub async fn cancel(&self, id: OrderId) -> Result<(), OrderOpsError> {
        self.backend.cancel_order(id).await?;
        tracing::info!(order_id = %id, "Order canceled");
        Ok(())
    }

    /// Remove an order record of any status.
    ///
    /// # Errors
    ///
    /// Returns `Tracking` if the backend has no such order and `Backend`
    /// for any other failure.
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderOpsError> {
        match self.backend.delete_order(id).await {
            Ok(()) => {
                tracing::info!(order_id = %id, "Order deleted");
                Ok(())
            }
            Err(BackendError::NotFound { .. }) => Err(OrderTrackingError::NotFound(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Change a pending order's quantity.
    ///
    /// # Errors
    ///
    /// Returns `Tracking` for a zero quantity, an unknown order or an order
    /// that is no longer pending; the backend is not called in those cases.
    pub async fn update_quantity(&self, id: OrderId, quantity: u32) -> Result<(), OrderOpsError> {
        if quantity == 0 {
            return Err(OrderTrackingError::InvalidQuantity { quantity }.into());
        }
        let orders = self.backend.get_orders(OrderQuery::pending()).await?;
        let order = orders
            .iter()
            .find(|o| o.id == id)
            .ok_or(OrderTrackingError::NotFound(id))?;
        order.ensure_quantity_editable(quantity)?;

        self.backend.update_order_quantity(id, quantity).await?;
        tracing::info!(order_id = %id, quantity, "Order quantity updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::mock_backend::MockBackend;
    use crate::domain::order_tracking::OrderStatus;
    use crate::domain::order_tracking::entities::fixtures::pending_order;

    fn fixture() -> (Arc<MockBackend>, ManageOrdersUseCase<MockBackend>) {
        let backend = Arc::new(MockBackend::default());
        *backend.orders.lock() = vec![
            pending_order(1, OrderStatus::Pending),
            pending_order(2, OrderStatus::Processing),
        ];
        let use_case = ManageOrdersUseCase::new(Arc::clone(&backend));
        (backend, use_case)
    }

    #[tokio::test]
    async fn updates_pending_order_quantity() {
        let (backend, use_case) = fixture();

        use_case.update_quantity(OrderId::new(1), 5).await.unwrap();

        assert_eq!(*backend.quantity_updates.lock(), vec![(OrderId::new(1), 5)]);
    }

    #[tokio::test]
    async fn zero_quantity_never_reaches_backend() {
        let (backend, use_case) = fixture();

        let Err(err) = use_case.update_quantity(OrderId::new(1), 0).await else {
            panic!("zero quantity should be rejected");
        };

        assert!(matches!(
            err,
            OrderOpsError::Tracking(OrderTrackingError::InvalidQuantity { quantity: 0 })
        ));
        assert!(backend.quantity_updates.lock().is_empty());
    }

    #[tokio::test]
    async fn processing_order_is_not_editable() {
        let (backend, use_case) = fixture();

        let result = use_case.update_quantity(OrderId::new(2), 4).await;

        assert!(matches!(
            result,
            Err(OrderOpsError::Tracking(OrderTrackingError::NotEditable { .. }))
        ));
        assert!(backend.quantity_updates.lock().is_empty());
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (_backend, use_case) = fixture();

        let result = use_case.update_quantity(OrderId::new(9), 4).await;

        assert!(matches!(
            result,
            Err(OrderOpsError::Tracking(OrderTrackingError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn cancel_forwards_to_backend() {
        let (backend, use_case) = fixture();

        use_case.cancel(OrderId::new(2)).await.unwrap();

        assert_eq!(*backend.canceled.lock(), vec![OrderId::new(2)]);
    }

    #[tokio::test]
    async fn delete_removes_order() {
        let (backend, use_case) = fixture();

        use_case.delete(OrderId::new(1)).await.unwrap();

        assert_eq!(*backend.deleted.lock(), vec![OrderId::new(1)]);
        let remaining = use_case.list(OrderQuery::pending()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, OrderId::new(2));
    }

    #[tokio::test]
    async fn delete_unknown_order_is_not_found() {
        let (backend, use_case) = fixture();

        let Err(err) = use_case.delete(OrderId::new(9)).await else {
            panic!("unknown order should not delete");
        };

        assert!(matches!(
            err,
            OrderOpsError::Tracking(OrderTrackingError::NotFound(id)) if id == OrderId::new(9)
        ));
        assert!(backend.deleted.lock().is_empty());
    }

    #[tokio::test]
    async fn list_returns_active_orders() {
        let (_backend, use_case) = fixture();

        let orders = use_case.list(OrderQuery::pending()).await.unwrap();

        assert_eq!(orders.len(), 2);
    }
}

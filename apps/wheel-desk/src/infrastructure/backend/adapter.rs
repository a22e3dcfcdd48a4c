//! Assistant backend adapter implementing WheelBackendPort.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::application::ports::{
    BackendError, ChainQuery, OrderQuery, RolloverReceipt, TickerChain, WheelBackendPort,
};
use crate::domain::option_chain::ExpirationDescriptor;
use crate::domain::order_tracking::{OrderDraft, PendingOrder};
use crate::domain::portfolio::{PortfolioAccount, Position};
use crate::domain::rollover::RolloverOrderPair;
use crate::domain::shared::{OrderId, Symbol};

use super::api_types::{
    AccountResponse, ChainResponse, CheckOrdersResponse, ExpirationsResponse, OrdersResponse,
    PositionsResponse, QuantityRequest, RolloverRequest, RolloverResponse, SaveOrderRequest,
    SaveOrderResponse, StockPricesResponse, orders_into_domain,
};
use super::config::BackendHttpConfig;
use super::error::BackendHttpError;
use super::http_client::BackendHttpClient;

/// HTTP adapter for the assistant backend.
#[derive(Debug, Clone)]
pub struct HttpWheelBackend {
    client: BackendHttpClient,
}

impl HttpWheelBackend {
    /// Create a new backend adapter.
    pub fn new(config: &BackendHttpConfig) -> Result<Self, BackendHttpError> {
        Ok(Self {
            client: BackendHttpClient::new(config)?,
        })
    }

    fn chain_params(query: &ChainQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("tickers", query.symbol.as_str().to_string()),
            ("otm", query.otm_pct.normalize().to_string()),
        ];
        if let Some(option_type) = query.option_type {
            params.push(("optionType", option_type.as_str().to_string()));
        }
        if let Some(expiration) = query.expiration {
            params.push(("expiration", expiration.compact()));
        }
        params
    }

    fn order_params(query: OrderQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("executed", query.executed.to_string())];
        if let Some(is_rollover) = query.is_rollover {
            params.push(("isRollover", is_rollover.to_string()));
        }
        params
    }
}

#[async_trait]
impl WheelBackendPort for HttpWheelBackend {
    async fn get_positions(&self) -> Result<Vec<Position>, BackendError> {
        let response: PositionsResponse = self
            .client
            .get("/portfolio/positions", &[])
            .await
            .map_err(BackendError::from)?;

        let rows = response.into_rows();
        let total = rows.len();
        let positions: Vec<Position> = rows
            .into_iter()
            .filter_map(|row| {
                let symbol = row.symbol.clone();
                let position = row.into_domain();
                if position.is_none() {
                    tracing::warn!(symbol = %symbol, "Skipping position without contract details");
                }
                position
            })
            .collect();

        tracing::debug!(total, kept = positions.len(), "Fetched positions");
        Ok(positions)
    }

    async fn get_account(&self) -> Result<PortfolioAccount, BackendError> {
        let response: Option<AccountResponse> = self
            .client
            .get("/portfolio/", &[])
            .await
            .map_err(BackendError::from)?;

        if response.is_none() {
            tracing::warn!("Backend returned no account summary");
        }
        Ok(response.map(PortfolioAccount::from).unwrap_or_default())
    }

    async fn get_option_chain(
        &self,
        query: &ChainQuery,
    ) -> Result<BTreeMap<Symbol, TickerChain>, BackendError> {
        tracing::debug!(
            symbol = %query.symbol,
            otm_pct = %query.otm_pct,
            option_type = ?query.option_type,
            expiration = ?query.expiration.map(|e| e.compact()),
            "Fetching option chain"
        );

        let response: ChainResponse = self
            .client
            .get("/options/otm", &Self::chain_params(query))
            .await
            .map_err(BackendError::from)?;

        Ok(response.into_domain())
    }

    async fn get_expirations(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<ExpirationDescriptor>, BackendError> {
        let response: ExpirationsResponse = self
            .client
            .get(
                "/options/expirations",
                &[("ticker", symbol.as_str().to_string())],
            )
            .await
            .map_err(BackendError::from)?;

        Ok(response.into_domain())
    }

    async fn get_stock_prices(
        &self,
        symbols: &[Symbol],
    ) -> Result<BTreeMap<Symbol, Decimal>, BackendError> {
        if symbols.is_empty() {
            return Ok(BTreeMap::new());
        }
        let tickers = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let response: StockPricesResponse = self
            .client
            .get("/options/stock-price", &[("tickers", tickers)])
            .await
            .map_err(BackendError::from)?;

        Ok(response.into_domain())
    }

    async fn save_order(&self, draft: &OrderDraft) -> Result<OrderId, BackendError> {
        let request = SaveOrderRequest::from(draft);

        tracing::info!(
            ticker = %draft.ticker,
            option_type = %draft.option_type.as_str(),
            action = %draft.action,
            strike = %draft.strike,
            expiration = %draft.expiration,
            quantity = draft.quantity,
            premium = %draft.premium,
            "Saving order"
        );

        let response: SaveOrderResponse = self
            .client
            .post_once("/options/order", &request)
            .await
            .map_err(BackendError::from)?;

        Ok(OrderId::new(response.order_id))
    }

    async fn submit_rollover(
        &self,
        pair: &RolloverOrderPair,
    ) -> Result<RolloverReceipt, BackendError> {
        let request = RolloverRequest::from(pair);

        tracing::info!(
            ticker = %request.ticker,
            quantity = request.quantity,
            current_strike = %request.current_strike,
            current_expiration = %request.current_expiration,
            new_strike = %request.new_strike,
            new_expiration = %request.new_expiration,
            close_limit = %request.current_limit_price,
            open_limit = %request.new_limit_price,
            "Submitting rollover"
        );

        let response: RolloverResponse = self
            .client
            .post_once("/options/rollover", &request)
            .await
            .map_err(BackendError::from)?;

        tracing::info!(
            buy_order_id = response.buy_order_id,
            sell_order_id = response.sell_order_id,
            "Rollover orders created"
        );

        Ok(RolloverReceipt {
            buy_order_id: OrderId::new(response.buy_order_id),
            sell_order_id: OrderId::new(response.sell_order_id),
        })
    }

    async fn execute_order(&self, id: OrderId) -> Result<(), BackendError> {
        tracing::info!(order_id = %id, "Executing order");
        let _: serde_json::Value = self
            .client
            .post_once(&format!("/options/execute/{id}"), &serde_json::json!({}))
            .await
            .map_err(BackendError::from)?;
        Ok(())
    }

    async fn cancel_order(&self, id: OrderId) -> Result<(), BackendError> {
        tracing::info!(order_id = %id, "Canceling order");
        self.client
            .post_empty(&format!("/options/cancel/{id}"))
            .await
            .map_err(BackendError::from)
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        tracing::info!(order_id = %id, "Deleting order");
        self.client
            .delete(&format!("/options/order/{id}"))
            .await
            .map_err(BackendError::from)
    }

    async fn update_order_quantity(
        &self,
        id: OrderId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        tracing::info!(order_id = %id, quantity, "Updating order quantity");
        self.client
            .put(
                &format!("/options/order/{id}/quantity"),
                &QuantityRequest { quantity },
            )
            .await
            .map_err(BackendError::from)
    }

    async fn get_orders(&self, query: OrderQuery) -> Result<Vec<PendingOrder>, BackendError> {
        let response: OrdersResponse = self
            .client
            .get("/options/pending-orders", &Self::order_params(query))
            .await
            .map_err(BackendError::from)?;

        Ok(orders_into_domain(response.orders))
    }

    async fn check_orders(&self) -> Result<Vec<PendingOrder>, BackendError> {
        let response: CheckOrdersResponse = self
            .client
            .post("/options/check-orders", &serde_json::json!({}))
            .await
            .map_err(BackendError::from)?;

        let updated = orders_into_domain(response.updated_orders);
        if !updated.is_empty() {
            tracing::info!(count = updated.len(), "Order statuses changed");
        }
        Ok(updated)
    }
}

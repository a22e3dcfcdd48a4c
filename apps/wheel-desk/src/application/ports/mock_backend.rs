//! Scriptable in-memory backend for use case tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::time::Instant;

use super::{BackendError, ChainQuery, OrderQuery, RolloverReceipt, TickerChain, WheelBackendPort};
use crate::domain::option_chain::ExpirationDescriptor;
use crate::domain::order_tracking::{OrderDraft, OrderStatus, PendingOrder};
use crate::domain::portfolio::{PortfolioAccount, Position};
use crate::domain::rollover::RolloverOrderPair;
use crate::domain::shared::{OrderId, Symbol};

fn unavailable(what: &str) -> BackendError {
    BackendError::Connection {
        message: format!("{what} unavailable"),
    }
}

/// Backend double recording every mutating call.
///
/// `check_script` supplies successive `check_orders` results; each changed
/// order it returns replaces the stored order with the same id. An empty
/// script reports no changes.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub positions: Mutex<Vec<Position>>,
    pub account: Mutex<PortfolioAccount>,
    pub chains: Mutex<BTreeMap<Symbol, TickerChain>>,
    pub failing_chains: Mutex<BTreeSet<Symbol>>,
    pub expirations: Mutex<Option<Vec<ExpirationDescriptor>>>,
    pub prices: Mutex<BTreeMap<Symbol, Decimal>>,
    pub orders: Mutex<Vec<PendingOrder>>,
    pub failing_orders: Mutex<BTreeSet<OrderId>>,
    pub fail_rollover: Mutex<bool>,
    pub chain_queries: Mutex<Vec<ChainQuery>>,
    pub saved: Mutex<Vec<OrderDraft>>,
    pub rollovers: Mutex<Vec<RolloverOrderPair>>,
    pub executed: Mutex<Vec<OrderId>>,
    pub canceled: Mutex<Vec<OrderId>>,
    pub quantity_updates: Mutex<Vec<(OrderId, u32)>>,
    pub deleted: Mutex<Vec<OrderId>>,
    pub check_script: Mutex<VecDeque<Result<Vec<PendingOrder>, BackendError>>>,
    pub check_calls: Mutex<usize>,
    pub timeline: Mutex<Vec<(String, Instant)>>,
}

impl MockBackend {
    fn mark(&self, call: impl Into<String>) {
        self.timeline.lock().push((call.into(), Instant::now()));
    }
}

#[async_trait]
impl WheelBackendPort for MockBackend {
    async fn get_positions(&self) -> Result<Vec<Position>, BackendError> {
        Ok(self.positions.lock().clone())
    }

    async fn get_account(&self) -> Result<PortfolioAccount, BackendError> {
        Ok(self.account.lock().clone())
    }

    async fn get_option_chain(
        &self,
        query: &ChainQuery,
    ) -> Result<BTreeMap<Symbol, TickerChain>, BackendError> {
        self.mark(format!("chain {} {:?}", query.symbol, query.option_type));
        self.chain_queries.lock().push(query.clone());
        if self.failing_chains.lock().contains(&query.symbol) {
            return Err(unavailable("chain"));
        }
        let chains = self.chains.lock();
        Ok(chains
            .get(&query.symbol)
            .map(|chain| BTreeMap::from([(query.symbol.clone(), chain.clone())]))
            .unwrap_or_default())
    }

    async fn get_expirations(
        &self,
        _symbol: &Symbol,
    ) -> Result<Vec<ExpirationDescriptor>, BackendError> {
        self.expirations
            .lock()
            .clone()
            .ok_or_else(|| unavailable("expirations"))
    }

    async fn get_stock_prices(
        &self,
        symbols: &[Symbol],
    ) -> Result<BTreeMap<Symbol, Decimal>, BackendError> {
        let prices = self.prices.lock();
        Ok(symbols
            .iter()
            .filter_map(|s| prices.get(s).map(|p| (s.clone(), *p)))
            .collect())
    }

    async fn save_order(&self, draft: &OrderDraft) -> Result<OrderId, BackendError> {
        self.mark("save");
        let mut saved = self.saved.lock();
        saved.push(draft.clone());
        Ok(OrderId::new(i64::try_from(saved.len()).unwrap_or(i64::MAX)))
    }

    async fn submit_rollover(
        &self,
        pair: &RolloverOrderPair,
    ) -> Result<RolloverReceipt, BackendError> {
        if *self.fail_rollover.lock() {
            return Err(BackendError::Rejected {
                status: 500,
                message: "Failed to create one or more rollover orders".into(),
            });
        }
        self.rollovers.lock().push(pair.clone());
        Ok(RolloverReceipt {
            buy_order_id: OrderId::new(101),
            sell_order_id: OrderId::new(102),
        })
    }

    async fn execute_order(&self, id: OrderId) -> Result<(), BackendError> {
        self.mark(format!("execute {id}"));
        if self.failing_orders.lock().contains(&id) {
            return Err(unavailable("broker"));
        }
        self.executed.lock().push(id);
        Ok(())
    }

    async fn cancel_order(&self, id: OrderId) -> Result<(), BackendError> {
        self.canceled.lock().push(id);
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        let mut orders = self.orders.lock();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        if orders.len() == before {
            return Err(BackendError::NotFound {
                resource: format!("Order with ID {id} not found"),
            });
        }
        self.deleted.lock().push(id);
        Ok(())
    }

    async fn update_order_quantity(&self, id: OrderId, quantity: u32) -> Result<(), BackendError> {
        self.quantity_updates.lock().push((id, quantity));
        Ok(())
    }

    async fn get_orders(&self, query: OrderQuery) -> Result<Vec<PendingOrder>, BackendError> {
        Ok(self
            .orders
            .lock()
            .iter()
            .filter(|o| {
                let executed_match = if query.executed {
                    o.executed
                } else {
                    matches!(o.status, OrderStatus::Pending | OrderStatus::Processing)
                };
                executed_match && query.is_rollover.is_none_or(|r| r == o.is_rollover)
            })
            .cloned()
            .collect())
    }

    async fn check_orders(&self) -> Result<Vec<PendingOrder>, BackendError> {
        *self.check_calls.lock() += 1;
        let step = self.check_script.lock().pop_front().unwrap_or_else(|| Ok(vec![]));
        let updated = step?;
        let mut orders = self.orders.lock();
        for change in &updated {
            if let Some(order) = orders.iter_mut().find(|o| o.id == change.id) {
                *order = change.clone();
            }
        }
        Ok(updated)
    }
}

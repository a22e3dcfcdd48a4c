//! Backend Port (Driven Port)
//!
//! Interface to the assistant backend: portfolio data, option chains and
//! order persistence. The backend owns broker execution.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_chain::{Expiration, ExpirationDescriptor, OptionQuote, OptionType};
use crate::domain::order_tracking::{OrderDraft, PendingOrder};
use crate::domain::portfolio::{PortfolioAccount, Position};
use crate::domain::rollover::RolloverOrderPair;
use crate::domain::shared::{OrderId, Symbol};

/// Option chain request for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainQuery {
    /// Ticker to fetch.
    pub symbol: Symbol,
    /// OTM target in percent; the backend returns strikes nearest it first.
    pub otm_pct: Decimal,
    /// Restrict to one side.
    pub option_type: Option<OptionType>,
    /// Restrict to one expiration.
    pub expiration: Option<Expiration>,
}

impl ChainQuery {
    /// Query for one side of a ticker.
    #[must_use]
    pub const fn new(symbol: Symbol, otm_pct: Decimal, option_type: OptionType) -> Self {
        Self {
            symbol,
            otm_pct,
            option_type: Some(option_type),
            expiration: None,
        }
    }

    /// Restrict to an expiration.
    #[must_use]
    pub const fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

/// Chain data the backend returns for one ticker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickerChain {
    /// Latest stock price.
    pub stock_price: Decimal,
    /// Shares held.
    pub position: Decimal,
    /// Call quotes, nearest target first.
    pub calls: Vec<OptionQuote>,
    /// Put quotes, nearest target first.
    pub puts: Vec<OptionQuote>,
}

impl TickerChain {
    /// Quotes for the given side.
    #[must_use]
    pub fn quotes(&self, option_type: OptionType) -> &[OptionQuote] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }
}

/// Filter for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderQuery {
    /// List executed orders instead of pending/processing ones.
    pub executed: bool,
    /// Only rollover legs (`Some(true)`), only plain orders (`Some(false)`),
    /// or everything.
    pub is_rollover: Option<bool>,
}

impl OrderQuery {
    /// Pending and processing orders of any kind.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            executed: false,
            is_rollover: None,
        }
    }

    /// Executed orders of any kind.
    #[must_use]
    pub const fn executed() -> Self {
        Self {
            executed: true,
            is_rollover: None,
        }
    }

    /// Restrict to rollover legs or to plain orders.
    #[must_use]
    pub const fn rollover(mut self, is_rollover: bool) -> Self {
        self.is_rollover = Some(is_rollover);
        self
    }
}

/// Order ids the backend assigned to a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverReceipt {
    /// Buy-to-close order.
    pub buy_order_id: OrderId,
    /// Sell-to-open order.
    pub sell_order_id: OrderId,
}

/// Backend port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Backend unreachable or the request timed out.
    #[error("Backend connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {resource}")]
    NotFound {
        /// The missing resource.
        resource: String,
    },

    /// Backend refused the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Backend message.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("Malformed backend response: {message}")]
    MalformedResponse {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited by backend")]
    RateLimited,

    /// Unknown error.
    #[error("Backend error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

impl BackendError {
    /// Returns true for failures worth retrying later.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::RateLimited)
    }
}

/// Port for the assistant backend.
#[async_trait]
pub trait WheelBackendPort: Send + Sync {
    /// Stock and option positions.
    async fn get_positions(&self) -> Result<Vec<Position>, BackendError>;

    /// Account balances.
    async fn get_account(&self) -> Result<PortfolioAccount, BackendError>;

    /// Option chain for one ticker.
    async fn get_option_chain(
        &self,
        query: &ChainQuery,
    ) -> Result<BTreeMap<Symbol, TickerChain>, BackendError>;

    /// Listed expirations for a ticker, in backend order.
    async fn get_expirations(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<ExpirationDescriptor>, BackendError>;

    /// Latest stock prices.
    async fn get_stock_prices(
        &self,
        symbols: &[Symbol],
    ) -> Result<BTreeMap<Symbol, Decimal>, BackendError>;

    /// Persist a single order.
    async fn save_order(&self, draft: &OrderDraft) -> Result<OrderId, BackendError>;

    /// Persist both legs of a roll in one request.
    async fn submit_rollover(
        &self,
        pair: &RolloverOrderPair,
    ) -> Result<RolloverReceipt, BackendError>;

    /// Send an order to the broker.
    async fn execute_order(&self, id: OrderId) -> Result<(), BackendError>;

    /// Cancel an order.
    async fn cancel_order(&self, id: OrderId) -> Result<(), BackendError>;

    /// Remove an order record.
    async fn delete_order(&self, id: OrderId) -> Result<(), BackendError>;

    /// Change the contract count of a pending order.
    async fn update_order_quantity(&self, id: OrderId, quantity: u32)
    -> Result<(), BackendError>;

    /// List orders.
    async fn get_orders(&self, query: OrderQuery) -> Result<Vec<PendingOrder>, BackendError>;

    /// Reconcile order statuses with the broker, returning changed orders.
    async fn check_orders(&self) -> Result<Vec<PendingOrder>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn chain_query_builder() {
        let exp = Expiration::parse("20250117").unwrap();
        let query = ChainQuery::new(Symbol::new("aapl"), dec!(10), OptionType::Put)
            .with_expiration(exp);
        assert_eq!(query.symbol.as_str(), "AAPL");
        assert_eq!(query.option_type, Some(OptionType::Put));
        assert_eq!(query.expiration, Some(exp));
    }

    #[test]
    fn order_query_variants() {
        assert!(!OrderQuery::pending().executed);
        assert!(OrderQuery::executed().executed);
        assert_eq!(OrderQuery::pending().rollover(true).is_rollover, Some(true));
    }

    #[test]
    fn transient_errors() {
        assert!(BackendError::RateLimited.is_transient());
        assert!(
            BackendError::Connection {
                message: "timeout".into()
            }
            .is_transient()
        );
        assert!(
            !BackendError::Rejected {
                status: 400,
                message: "bad".into()
            }
            .is_transient()
        );
    }
}

//! Assistant backend request and response types.
//!
//! These types map directly to the backend's JSON. Numeric fields are
//! decoded leniently: the backend passes through broker data where a
//! number may arrive as a JSON number, a numeric string, `null` or the
//! string `"NaN"`. Unusable values become zero (or `None` where the domain
//! distinguishes "missing").

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::ports::TickerChain;
use crate::domain::option_chain::{Expiration, ExpirationDescriptor, OptionQuote, OptionType};
use crate::domain::order_tracking::{OrderAction, OrderDraft, OrderStatus, PendingOrder};
use crate::domain::portfolio::{OptionDetails, PortfolioAccount, Position};
use crate::domain::rollover::RolloverOrderPair;
use crate::domain::shared::{OrderId, Symbol};

// ============================================================================
// Lenient Field Decoding
// ============================================================================

/// Largest magnitude accepted for a price, strike, quantity or balance.
pub const MAX_WIRE_MAGNITUDE: Decimal = dec!(1_000_000_000_000);

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .filter(|d| d.abs() <= MAX_WIRE_MAGNITUDE)
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

fn f64_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value).unwrap_or_default())
}

fn lenient_opt_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(f64_from_value(&value))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(f64_from_value(&value)
        .filter(|v| *v >= 0.0)
        .map_or(0, |v| v.trunc() as u64))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

fn lenient_option_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OptionType>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(OptionType::parse))
}

fn lenient_expiration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Expiration>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Expiration::parse(&s).ok(),
        Value::Number(n) => Expiration::parse(&n.to_string()).ok(),
        _ => None,
    })
}

fn parse_action(raw: &str) -> Option<OrderAction> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "BUY" => Some(OrderAction::Buy),
        "SELL" => Some(OrderAction::Sell),
        _ => None,
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Error message (Flask routes use `error`).
    #[serde(default)]
    pub error: Option<String>,
    /// Alternate message field.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The most specific message present.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.is_empty())
    }
}

// ============================================================================
// Portfolio Types
// ============================================================================

/// Account summary from `GET /portfolio/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountResponse {
    /// Broker account identifier.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Settled cash.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cash_balance: Decimal,
    /// Account total.
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub account_value: Option<Decimal>,
    /// Excess liquidity.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub excess_liquidity: Decimal,
    /// Initial margin.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub initial_margin: Decimal,
    /// Leverage percentage.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub leverage_percentage: Decimal,
}

impl From<AccountResponse> for PortfolioAccount {
    fn from(resp: AccountResponse) -> Self {
        Self {
            account_id: resp.account_id,
            cash_balance: resp.cash_balance,
            account_value: resp.account_value,
            excess_liquidity: resp.excess_liquidity,
            initial_margin: resp.initial_margin,
            leverage_percentage: resp.leverage_percentage,
        }
    }
}

/// One row of `GET /portfolio/positions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionResponse {
    /// Ticker (underlying for options).
    #[serde(default)]
    pub symbol: String,
    /// Signed shares or contracts.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub position: Decimal,
    /// Market price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub market_price: Decimal,
    /// Market value.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub market_value: Decimal,
    /// Average cost.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub avg_cost: Decimal,
    /// Unrealized P&L.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unrealized_pnl: Decimal,
    /// `STK` or `OPT`.
    #[serde(default)]
    pub security_type: String,
    /// Option expiration (`YYYYMMDD`).
    #[serde(default, deserialize_with = "lenient_expiration")]
    pub expiration: Option<Expiration>,
    /// Option strike.
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub strike: Option<Decimal>,
    /// Option type in any spelling.
    #[serde(default, deserialize_with = "lenient_option_type")]
    pub option_type: Option<OptionType>,
    /// Option delta.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub delta: Option<f64>,
    /// Option implied volatility.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub implied_volatility: Option<f64>,
    /// Option bid.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub bid: Decimal,
    /// Option ask.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ask: Decimal,
    /// Option last.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last: Decimal,
}

impl PositionResponse {
    fn is_option(&self) -> bool {
        matches!(
            self.security_type.trim().to_ascii_uppercase().as_str(),
            "OPT" | "OPTION"
        )
    }

    /// Convert to a domain position.
    ///
    /// Returns `None` for rows without a symbol and option rows missing
    /// strike, expiration or type.
    pub fn into_domain(self) -> Option<Position> {
        let symbol = Symbol::new(&self.symbol);
        if symbol.as_str().is_empty() {
            return None;
        }
        let mut position = if self.is_option() {
            let details = OptionDetails {
                strike: self.strike?,
                expiration: self.expiration?,
                option_type: self.option_type?,
                delta: self.delta,
                implied_volatility: self.implied_volatility,
                bid: self.bid,
                ask: self.ask,
                last: self.last,
            };
            Position::option(symbol, self.position, details)
        } else {
            Position::stock(symbol, self.position, self.market_price)
        };
        position.avg_cost = self.avg_cost;
        position.market_price = self.market_price;
        position.market_value = self.market_value;
        position.unrealized_pnl = self.unrealized_pnl;
        Some(position)
    }
}

/// Positions arrive either as a bare list or wrapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PositionsResponse {
    /// `[ {...}, ... ]`
    List(Vec<PositionResponse>),
    /// `{ "positions": [ ... ] }`
    Wrapped {
        /// Position rows.
        positions: Vec<PositionResponse>,
    },
}

impl PositionsResponse {
    /// Position rows regardless of envelope.
    pub fn into_rows(self) -> Vec<PositionResponse> {
        match self {
            Self::List(rows) | Self::Wrapped { positions: rows } => rows,
        }
    }
}

// ============================================================================
// Option Chain Types
// ============================================================================

/// One quote row of a chain response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteResponse {
    /// Strike.
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub strike: Option<Decimal>,
    /// Expiration.
    #[serde(default, deserialize_with = "lenient_expiration")]
    pub expiration: Option<Expiration>,
    /// Bid.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub bid: Decimal,
    /// Ask.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ask: Decimal,
    /// Last.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last: Decimal,
    /// Delta.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub delta: Option<f64>,
    /// Gamma.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub gamma: Option<f64>,
    /// Theta.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub theta: Option<f64>,
    /// Vega.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub vega: Option<f64>,
    /// Implied volatility.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub implied_volatility: Option<f64>,
    /// Volume.
    #[serde(default, deserialize_with = "lenient_count")]
    pub volume: u64,
    /// Open interest.
    #[serde(default, deserialize_with = "lenient_count")]
    pub open_interest: u64,
}

impl From<QuoteResponse> for OptionQuote {
    fn from(resp: QuoteResponse) -> Self {
        Self {
            strike: resp.strike.filter(|s| *s > Decimal::ZERO),
            expiration: resp.expiration,
            bid: resp.bid,
            ask: resp.ask,
            last: resp.last,
            delta: resp.delta,
            gamma: resp.gamma,
            theta: resp.theta,
            vega: resp.vega,
            implied_volatility: resp.implied_volatility,
            volume: resp.volume,
            open_interest: resp.open_interest,
        }
    }
}

/// One ticker of a chain response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainEntryResponse {
    /// Underlying price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub stock_price: Decimal,
    /// Shares held.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub position: Decimal,
    /// Call quotes.
    #[serde(default)]
    pub calls: Vec<QuoteResponse>,
    /// Put quotes.
    #[serde(default)]
    pub puts: Vec<QuoteResponse>,
}

impl From<ChainEntryResponse> for TickerChain {
    fn from(resp: ChainEntryResponse) -> Self {
        Self {
            stock_price: resp.stock_price,
            position: resp.position,
            calls: resp.calls.into_iter().map(OptionQuote::from).collect(),
            puts: resp.puts.into_iter().map(OptionQuote::from).collect(),
        }
    }
}

/// `GET /options/otm` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainResponse {
    /// Chains keyed by ticker.
    #[serde(default)]
    pub data: BTreeMap<String, ChainEntryResponse>,
}

impl ChainResponse {
    /// Chains keyed by normalized symbol.
    pub fn into_domain(self) -> BTreeMap<Symbol, TickerChain> {
        self.data
            .into_iter()
            .map(|(ticker, entry)| (Symbol::new(ticker), TickerChain::from(entry)))
            .collect()
    }
}

/// One listed expiration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpirationEntry {
    /// Date in either accepted format.
    pub value: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

/// `GET /options/expirations` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpirationsResponse {
    /// Listed expirations.
    #[serde(default)]
    pub expirations: Vec<ExpirationEntry>,
}

impl ExpirationsResponse {
    /// Parsed expirations in ascending order; unparseable entries are dropped.
    pub fn into_domain(self) -> Vec<ExpirationDescriptor> {
        let mut listed: Vec<ExpirationDescriptor> = self
            .expirations
            .into_iter()
            .filter_map(|entry| {
                let value = Expiration::parse(&entry.value).ok()?;
                Some(ExpirationDescriptor {
                    label: entry.label.unwrap_or_else(|| value.label()),
                    value,
                })
            })
            .collect();
        listed.sort_by_key(|d| d.value);
        listed.dedup_by_key(|d| d.value);
        listed
    }
}

/// `GET /options/stock-price` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockPricesResponse {
    /// Prices keyed by ticker, in any numeric encoding.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl StockPricesResponse {
    /// Usable prices keyed by normalized symbol.
    pub fn into_domain(self) -> BTreeMap<Symbol, Decimal> {
        self.data
            .into_iter()
            .filter_map(|(ticker, value)| Some((Symbol::new(ticker), decimal_from_value(&value)?)))
            .collect()
    }
}

// ============================================================================
// Order Types
// ============================================================================

/// `POST /options/order` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOrderRequest {
    /// Underlying ticker.
    pub ticker: String,
    /// `CALL` or `PUT`.
    pub option_type: OptionType,
    /// `BUY` or `SELL`.
    pub action: OrderAction,
    /// Strike.
    #[serde(with = "rust_decimal::serde::float")]
    pub strike: Decimal,
    /// Expiration (`YYYYMMDD`).
    pub expiration: Expiration,
    /// Premium per share.
    #[serde(with = "rust_decimal::serde::float")]
    pub premium: Decimal,
    /// Contracts.
    pub quantity: u32,
    /// Bid.
    #[serde(with = "rust_decimal::serde::float")]
    pub bid: Decimal,
    /// Ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub ask: Decimal,
    /// Last.
    #[serde(with = "rust_decimal::serde::float")]
    pub last: Decimal,
    /// Delta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    /// Gamma.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    /// Theta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    /// Vega.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
    /// Implied volatility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
    /// Open interest.
    pub open_interest: u64,
    /// Volume.
    pub volume: u64,
    /// Earnings: contracts supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings_max_contracts: Option<u32>,
    /// Earnings: premium per contract.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub earnings_premium_per_contract: Option<Decimal>,
    /// Earnings: total premium.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub earnings_total_premium: Option<Decimal>,
    /// Earnings: return on cash, percent.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub earnings_return_on_cash: Option<Decimal>,
    /// Earnings: return on capital, percent.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub earnings_return_on_capital: Option<Decimal>,
    /// Always false for single orders.
    #[serde(rename = "isRollover")]
    pub is_rollover: bool,
}

impl From<&OrderDraft> for SaveOrderRequest {
    fn from(draft: &OrderDraft) -> Self {
        let earnings = draft.earnings.as_ref();
        Self {
            ticker: draft.ticker.as_str().to_string(),
            option_type: draft.option_type,
            action: draft.action,
            strike: draft.strike,
            expiration: draft.expiration,
            premium: draft.premium,
            quantity: draft.quantity,
            bid: draft.quote.bid,
            ask: draft.quote.ask,
            last: draft.quote.last,
            delta: draft.quote.delta,
            gamma: draft.quote.gamma,
            theta: draft.quote.theta,
            vega: draft.quote.vega,
            implied_volatility: draft.quote.implied_volatility,
            open_interest: draft.quote.open_interest,
            volume: draft.quote.volume,
            earnings_max_contracts: earnings.map(|e| e.max_contracts),
            earnings_premium_per_contract: earnings.map(|e| e.premium_per_contract),
            earnings_total_premium: earnings.map(|e| e.total_premium),
            earnings_return_on_cash: earnings.map(|e| e.return_on_cash),
            earnings_return_on_capital: earnings.map(|e| e.return_on_capital),
            is_rollover: false,
        }
    }
}

/// `POST /options/order` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveOrderResponse {
    /// New order id.
    pub order_id: i64,
}

/// `POST /options/rollover` request body.
///
/// The closing limit is per contract; the opening limit is per share and
/// the backend scales it to a contract.
#[derive(Debug, Clone, Serialize)]
pub struct RolloverRequest {
    /// Underlying ticker.
    pub ticker: String,
    /// Contracts on both legs.
    pub quantity: u32,
    /// Held option type.
    pub current_option_type: OptionType,
    /// Held strike.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_strike: Decimal,
    /// Held expiration.
    pub current_expiration: Expiration,
    /// Closing leg pricing type.
    pub current_order_type: String,
    /// Closing limit per contract.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_limit_price: Decimal,
    /// Held bid.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_bid: Decimal,
    /// Held ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_ask: Decimal,
    /// Replacement strike.
    #[serde(with = "rust_decimal::serde::float")]
    pub new_strike: Decimal,
    /// Replacement expiration.
    pub new_expiration: Expiration,
    /// Opening leg pricing type.
    pub new_order_type: String,
    /// Opening limit per share.
    #[serde(with = "rust_decimal::serde::float")]
    pub new_limit_price: Decimal,
    /// Replacement bid.
    #[serde(with = "rust_decimal::serde::float")]
    pub new_bid: Decimal,
    /// Replacement ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub new_ask: Decimal,
}

impl From<&RolloverOrderPair> for RolloverRequest {
    fn from(pair: &RolloverOrderPair) -> Self {
        let close = &pair.buy_to_close;
        let open = &pair.sell_to_open;
        Self {
            ticker: close.contract.ticker.as_str().to_string(),
            quantity: close.contract.quantity,
            current_option_type: close.contract.option_type,
            current_strike: close.contract.strike,
            current_expiration: close.contract.expiration,
            current_order_type: close.order_type.to_string(),
            current_limit_price: close.limit_price_per_contract,
            current_bid: close.contract.bid,
            current_ask: close.contract.ask,
            new_strike: open.contract.strike,
            new_expiration: open.contract.expiration,
            new_order_type: open.order_type.to_string(),
            new_limit_price: open.limit_price_per_unit,
            new_bid: open.contract.bid,
            new_ask: open.contract.ask,
        }
    }
}

/// `POST /options/rollover` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RolloverResponse {
    /// Buy-to-close order id.
    pub buy_order_id: i64,
    /// Sell-to-open order id.
    pub sell_order_id: i64,
}

/// `PUT /options/order/{id}/quantity` request body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuantityRequest {
    /// New contract count.
    pub quantity: u32,
}

/// One stored order row.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    /// Order id.
    pub id: i64,
    /// Underlying ticker.
    #[serde(default)]
    pub ticker: String,
    /// Option type in any spelling.
    #[serde(default, deserialize_with = "lenient_option_type")]
    pub option_type: Option<OptionType>,
    /// `BUY` or `SELL`.
    #[serde(default)]
    pub action: String,
    /// Strike.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub strike: Decimal,
    /// Expiration.
    #[serde(default, deserialize_with = "lenient_expiration")]
    pub expiration: Option<Expiration>,
    /// Contracts.
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: u64,
    /// Premium per share.
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub premium: Option<Decimal>,
    /// Status string.
    #[serde(default = "default_status")]
    pub status: OrderStatus,
    /// SQLite boolean (0/1).
    #[serde(default, deserialize_with = "lenient_bool")]
    pub executed: bool,
    /// SQLite boolean (0/1).
    #[serde(default, rename = "isRollover", deserialize_with = "lenient_bool")]
    pub is_rollover: bool,
    /// Creation time.
    #[serde(default)]
    pub timestamp: Option<String>,
}

const fn default_status() -> OrderStatus {
    OrderStatus::Pending
}

impl OrderRow {
    /// Convert to a domain order; rows missing type, action or expiration
    /// are dropped.
    pub fn into_domain(self) -> Option<PendingOrder> {
        Some(PendingOrder {
            id: OrderId::new(self.id),
            ticker: Symbol::new(self.ticker),
            option_type: self.option_type?,
            action: parse_action(&self.action)?,
            strike: self.strike,
            expiration: self.expiration?,
            quantity: u32::try_from(self.quantity).unwrap_or(u32::MAX),
            premium: self.premium,
            status: self.status,
            executed: self.executed,
            is_rollover: self.is_rollover,
            timestamp: self.timestamp,
        })
    }
}

/// `GET /options/pending-orders` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersResponse {
    /// Order rows.
    #[serde(default)]
    pub orders: Vec<OrderRow>,
}

/// `POST /options/check-orders` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckOrdersResponse {
    /// Orders whose status changed.
    #[serde(default)]
    pub updated_orders: Vec<OrderRow>,
}

/// Convert order rows, logging the ones that cannot be represented.
pub fn orders_into_domain(rows: Vec<OrderRow>) -> Vec<PendingOrder> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            let order = row.into_domain();
            if order.is_none() {
                tracing::warn!(order_id = id, "Skipping malformed order row");
            }
            order
        })
        .collect()
}

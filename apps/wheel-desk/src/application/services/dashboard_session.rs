//! Dashboard Session
//!
//! Explicit session state owned by the controller: the ticker map, the
//! custom/excluded ticker sets, the account snapshot, the roll session and
//! the in-flight action registry.
//!
//! Ticker leaves (price, shares, calls, puts, settings) are only ever
//! replaced whole under the write lock, so readers see either the old or
//! the new list and never a partial update.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use parking_lot::{Mutex, MutexGuard, RwLock};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::PersistedSettings;
use crate::domain::allocation::{EarningsSummary, TickerSettings, TickerSnapshot, compute_summary};
use crate::domain::option_chain::{OptionQuote, OptionType};
use crate::domain::portfolio::{PortfolioAccount, Position};
use crate::domain::rollover::RolloverSession;
use crate::domain::shared::{DomainError, Symbol};

/// User-triggered actions that must not run twice concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionAction {
    /// Reload positions and account.
    LoadPortfolio,
    /// Refresh every ticker.
    RefreshAll,
    /// Refresh a single ticker.
    RefreshTicker(Symbol),
    /// Save opportunity orders in bulk.
    SaveOpportunities,
    /// Execute all pending orders.
    ExecuteAll,
    /// Fetch roll expirations or suggestions.
    RolloverFetch,
    /// Submit a roll.
    RolloverSubmit,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadPortfolio => write!(f, "load portfolio"),
            Self::RefreshAll => write!(f, "refresh all tickers"),
            Self::RefreshTicker(symbol) => write!(f, "refresh {symbol}"),
            Self::SaveOpportunities => write!(f, "save opportunity orders"),
            Self::ExecuteAll => write!(f, "execute all orders"),
            Self::RolloverFetch => write!(f, "fetch rollover suggestions"),
            Self::RolloverSubmit => write!(f, "submit rollover"),
        }
    }
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The same action is already running.
    #[error("'{0}' is already in progress")]
    ActionInFlight(SessionAction),

    /// Ticker is not tracked by the session.
    #[error("Unknown ticker: {0}")]
    UnknownTicker(Symbol),

    /// Ticker is already tracked.
    #[error("Ticker {0} is already tracked")]
    AlreadyTracked(Symbol),

    /// Rejected settings or ticker input.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Defaults applied to newly tracked tickers and roll sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDefaults {
    /// Default settings for new tickers.
    pub ticker_settings: TickerSettings,
    /// Default roll OTM target.
    pub rollover_otm_pct: Decimal,
    /// Days added to the held expiration for the roll target.
    pub rollover_offset_days: i64,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            ticker_settings: TickerSettings::default(),
            rollover_otm_pct: Decimal::TEN,
            rollover_offset_days: 7,
        }
    }
}

/// Held while an action runs; releases the action on drop.
#[derive(Debug)]
pub struct ActionGuard<'a> {
    registry: &'a Mutex<HashSet<SessionAction>>,
    action: SessionAction,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.action);
    }
}

/// Dashboard session state.
#[derive(Debug)]
pub struct DashboardSession {
    defaults: SessionDefaults,
    tickers: RwLock<BTreeMap<Symbol, TickerSnapshot>>,
    settings: RwLock<BTreeMap<Symbol, TickerSettings>>,
    custom: RwLock<BTreeSet<Symbol>>,
    excluded: RwLock<BTreeSet<Symbol>>,
    account: RwLock<PortfolioAccount>,
    positions: RwLock<Vec<Position>>,
    rollover: Mutex<RolloverSession>,
    in_flight: Mutex<HashSet<SessionAction>>,
}

impl DashboardSession {
    /// Empty session.
    #[must_use]
    pub fn new(defaults: SessionDefaults) -> Self {
        Self {
            defaults,
            tickers: RwLock::new(BTreeMap::new()),
            settings: RwLock::new(BTreeMap::new()),
            custom: RwLock::new(BTreeSet::new()),
            excluded: RwLock::new(BTreeSet::new()),
            account: RwLock::new(PortfolioAccount::default()),
            positions: RwLock::new(Vec::new()),
            rollover: Mutex::new(RolloverSession::new(
                defaults.rollover_otm_pct,
                defaults.rollover_offset_days,
            )),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Session restored from persisted settings; custom tickers are tracked
    /// immediately.
    #[must_use]
    pub fn restore(defaults: SessionDefaults, persisted: PersistedSettings) -> Self {
        let session = Self::new(defaults);
        *session.settings.write() = persisted.ticker_settings;
        *session.excluded.write() = persisted.excluded_tickers;
        for symbol in &persisted.custom_tickers {
            let snapshot = TickerSnapshot::custom(symbol.clone())
                .with_settings(session.settings_for(symbol));
            session.tickers.write().insert(symbol.clone(), snapshot);
        }
        *session.custom.write() = persisted.custom_tickers;
        session
    }

    /// Settings and ticker lists to persist.
    #[must_use]
    pub fn persisted(&self) -> PersistedSettings {
        PersistedSettings {
            ticker_settings: self.settings.read().clone(),
            custom_tickers: self.custom.read().clone(),
            excluded_tickers: self.excluded.read().clone(),
        }
    }

    /// Claim an action, rejecting it if it is already running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ActionInFlight` for a duplicate.
    pub fn begin(&self, action: SessionAction) -> Result<ActionGuard<'_>, SessionError> {
        let mut registry = self.in_flight.lock();
        if !registry.insert(action.clone()) {
            return Err(SessionError::ActionInFlight(action));
        }
        Ok(ActionGuard {
            registry: &self.in_flight,
            action,
        })
    }

    /// Whether an action is currently running.
    #[must_use]
    pub fn is_in_flight(&self, action: &SessionAction) -> bool {
        self.in_flight.lock().contains(action)
    }

    /// Settings for a ticker, falling back to the defaults.
    #[must_use]
    pub fn settings_for(&self, symbol: &Symbol) -> TickerSettings {
        self.settings
            .read()
            .get(symbol)
            .copied()
            .unwrap_or(self.defaults.ticker_settings)
    }

    /// Track every stock position not excluded, replacing price and shares.
    ///
    /// Portfolio tickers no longer held are dropped; custom tickers stay.
    pub fn seed_from_positions(&self, positions: Vec<Position>) {
        let excluded = self.excluded.read().clone();
        let custom = self.custom.read().clone();
        let held: BTreeMap<Symbol, (Decimal, Decimal)> = positions
            .iter()
            .filter(|p| p.is_stock() && !excluded.contains(&p.symbol))
            .map(|p| (p.symbol.clone(), (p.market_price, p.quantity)))
            .collect();

        {
            let mut tickers = self.tickers.write();
            tickers.retain(|symbol, snapshot| snapshot.is_custom || held.contains_key(symbol));
            for (symbol, (price, shares)) in held {
                if custom.contains(&symbol) {
                    continue;
                }
                let settings = self.settings_for(&symbol);
                let entry = tickers
                    .entry(symbol.clone())
                    .or_insert_with(|| TickerSnapshot::new(symbol).with_settings(settings));
                entry.stock_price = price;
                entry.shares = shares;
            }
        }
        *self.positions.write() = positions;
    }

    /// Replace the account snapshot.
    pub fn set_account(&self, account: PortfolioAccount) {
        *self.account.write() = account;
    }

    /// Current account snapshot.
    #[must_use]
    pub fn account(&self) -> PortfolioAccount {
        self.account.read().clone()
    }

    /// Positions from the last portfolio load.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.positions.read().clone()
    }

    /// Tracked tickers in symbol order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.tickers.read().keys().cloned().collect()
    }

    /// Copy of one ticker snapshot.
    #[must_use]
    pub fn snapshot(&self, symbol: &Symbol) -> Option<TickerSnapshot> {
        self.tickers.read().get(symbol).cloned()
    }

    /// Copies of every ticker snapshot in symbol order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<TickerSnapshot> {
        self.tickers.read().values().cloned().collect()
    }

    /// Earnings summary over the current snapshots and account.
    #[must_use]
    pub fn summary(&self) -> EarningsSummary {
        compute_summary(&self.snapshots(), &self.account.read())
    }

    fn with_ticker<F>(&self, symbol: &Symbol, update: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut TickerSnapshot),
    {
        let mut tickers = self.tickers.write();
        let snapshot = tickers
            .get_mut(symbol)
            .ok_or_else(|| SessionError::UnknownTicker(symbol.clone()))?;
        update(snapshot);
        Ok(())
    }

    /// Replace a ticker's stock price.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTicker` if the ticker is not tracked.
    pub fn replace_price(&self, symbol: &Symbol, price: Decimal) -> Result<(), SessionError> {
        self.with_ticker(symbol, |s| s.stock_price = price)
    }

    /// Replace one side's quote list.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTicker` if the ticker is not tracked.
    pub fn replace_quotes(
        &self,
        symbol: &Symbol,
        option_type: OptionType,
        quotes: Vec<OptionQuote>,
    ) -> Result<(), SessionError> {
        self.with_ticker(symbol, |s| match option_type {
            OptionType::Call => s.calls = quotes,
            OptionType::Put => s.puts = quotes,
        })
    }

    /// Add a user ticker with no shares.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyTracked` if the ticker is already in the map.
    pub fn add_custom(&self, symbol: Symbol) -> Result<(), SessionError> {
        let mut tickers = self.tickers.write();
        if tickers.contains_key(&symbol) {
            return Err(SessionError::AlreadyTracked(symbol));
        }
        let snapshot =
            TickerSnapshot::custom(symbol.clone()).with_settings(self.settings_for(&symbol));
        tickers.insert(symbol.clone(), snapshot);
        self.custom.write().insert(symbol);
        Ok(())
    }

    /// Remove a user ticker and its settings.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTicker` if it is not a custom ticker.
    pub fn remove_custom(&self, symbol: &Symbol) -> Result<(), SessionError> {
        if !self.custom.write().remove(symbol) {
            return Err(SessionError::UnknownTicker(symbol.clone()));
        }
        self.tickers.write().remove(symbol);
        self.settings.write().remove(symbol);
        Ok(())
    }

    /// Hide a portfolio ticker; it is dropped from the map until included.
    pub fn exclude(&self, symbol: Symbol) {
        let is_custom = self.custom.read().contains(&symbol);
        if !is_custom {
            self.tickers.write().remove(&symbol);
        }
        self.excluded.write().insert(symbol);
    }

    /// Show a previously excluded ticker again, restoring it from the last
    /// loaded positions when held.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTicker` if it was not excluded.
    pub fn include(&self, symbol: &Symbol) -> Result<(), SessionError> {
        if !self.excluded.write().remove(symbol) {
            return Err(SessionError::UnknownTicker(symbol.clone()));
        }
        let positions = self.positions();
        self.seed_from_positions(positions);
        Ok(())
    }

    /// Excluded tickers.
    #[must_use]
    pub fn excluded(&self) -> BTreeSet<Symbol> {
        self.excluded.read().clone()
    }

    /// Replace a ticker's settings.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for out-of-range settings.
    pub fn update_settings(
        &self,
        symbol: &Symbol,
        settings: TickerSettings,
    ) -> Result<(), SessionError> {
        settings.validate()?;
        self.settings.write().insert(symbol.clone(), settings);
        if let Some(snapshot) = self.tickers.write().get_mut(symbol) {
            snapshot.settings = settings;
        }
        Ok(())
    }

    /// Exclusive access to the roll session. Never hold across an await.
    pub fn rollover(&self) -> MutexGuard<'_, RolloverSession> {
        self.rollover.lock()
    }
}

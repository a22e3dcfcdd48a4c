//! Refresh Tickers Use Case
//!
//! Loads the portfolio into the session and refreshes ticker chains, one
//! ticker at a time.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::dto::BulkOutcome;
use crate::application::ports::{BackendError, ChainQuery, TickerChain, WheelBackendPort};
use crate::application::services::{DashboardSession, SessionAction, SessionError};
use crate::domain::option_chain::{Expiration, OptionType};
use crate::domain::shared::Symbol;

/// Errors from loading or refreshing tickers.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Rejected by the session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Use case for keeping ticker snapshots current.
pub struct RefreshTickersUseCase<B>
where
    B: WheelBackendPort,
{
    backend: Arc<B>,
    session: Arc<DashboardSession>,
    delay: Duration,
}

impl<B> RefreshTickersUseCase<B>
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

    /// Reload positions and account, then reseed the ticker map.
    ///
    /// # Errors
    ///
    /// Returns `Session` if a load is already running and `Backend` if
    /// either call fails; the session is left untouched on failure.
    pub async fn load_portfolio(&self) -> Result<(), RefreshError> {
        let _guard = self.session.begin(SessionAction::LoadPortfolio)?;
        let positions = self.backend.get_positions().await?;
        let account = self.backend.get_account().await?;
        tracing::info!(positions = positions.len(), "Portfolio loaded");
        self.session.seed_from_positions(positions);
        self.session.set_account(account);
        Ok(())
    }

    /// Refresh one ticker's chains.
    ///
    /// # Errors
    ///
    /// Returns `Session` for a duplicate refresh or an untracked ticker and
    /// `Backend` if a chain fetch fails.
    pub async fn refresh_ticker(
        &self,
        symbol: &Symbol,
        expiration: Option<Expiration>,
    ) -> Result<(), RefreshError> {
        let _guard = self
            .session
            .begin(SessionAction::RefreshTicker(symbol.clone()))?;
        self.refresh_one(symbol, expiration).await
    }

    /// Refresh every tracked ticker in order, sleeping between tickers.
    ///
    /// Each ticker is claimed like a single refresh while it runs, so a
    /// ticker already being refreshed on its own is recorded as failed.
    /// A failed ticker is recorded and the rest continue.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ActionInFlight` if a bulk refresh is running.
    pub async fn refresh_all(
        &self,
        expiration: Option<Expiration>,
    ) -> Result<BulkOutcome, SessionError> {
        let _guard = self.session.begin(SessionAction::RefreshAll)?;
        let mut outcome = BulkOutcome::default();

        for (index, symbol) in self.session.symbols().iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }
            let result = match self.session.begin(SessionAction::RefreshTicker(symbol.clone())) {
                Ok(_item) => self.refresh_one(symbol, expiration).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Ticker refresh failed");
                    outcome.record_failure(symbol.as_str(), e);
                }
            }
        }

        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Ticker refresh complete"
        );
        Ok(outcome)
    }

    /// Refresh stock prices for every tracked ticker in one call.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the price lookup fails.
    pub async fn refresh_prices(&self) -> Result<usize, RefreshError> {
        let symbols = self.session.symbols();
        if symbols.is_empty() {
            return Ok(0);
        }
        let prices = self.backend.get_stock_prices(&symbols).await?;
        let mut updated = 0;
        for (symbol, price) in prices {
            if price > Decimal::ZERO && self.session.replace_price(&symbol, price).is_ok() {
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn refresh_one(
        &self,
        symbol: &Symbol,
        expiration: Option<Expiration>,
    ) -> Result<(), RefreshError> {
        let snapshot = self
            .session
            .snapshot(symbol)
            .ok_or_else(|| SessionError::UnknownTicker(symbol.clone()))?;
        // Custom tickers hold no shares to cover, so only puts matter.
        let sides: &[OptionType] = if snapshot.is_custom {
            &[OptionType::Put]
        } else {
            &[OptionType::Call, OptionType::Put]
        };

        for &side in sides {
            let mut query =
                ChainQuery::new(symbol.clone(), snapshot.settings.otm_pct(side), side);
            if let Some(expiration) = expiration {
                query = query.with_expiration(expiration);
            }
            let mut chains = self.backend.get_option_chain(&query).await?;
            let chain: TickerChain = chains.remove(symbol).unwrap_or_default();

            if chain.stock_price > Decimal::ZERO {
                self.session.replace_price(symbol, chain.stock_price)?;
            }
            self.session
                .replace_quotes(symbol, side, chain.quotes(side).to_vec())?;
            tracing::debug!(
                symbol = %symbol,
                side = %side,
                quotes = chain.quotes(side).len(),
                "Chain refreshed"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::mock_backend::MockBackend;
    use crate::application::services::SessionDefaults;
    use crate::domain::option_chain::OptionQuote;
    use crate::domain::portfolio::{PortfolioAccount, Position};
    use rust_decimal_macros::dec;

    fn chain(price: Decimal) -> TickerChain {
        TickerChain {
            stock_price: price,
            position: Decimal::ZERO,
            calls: vec![OptionQuote::new(dec!(165), dec!(1.20), dec!(1.25))],
            puts: vec![OptionQuote::new(dec!(135), dec!(0.95), dec!(1.00))],
        }
    }

    type Fixture = (
        Arc<MockBackend>,
        Arc<DashboardSession>,
        RefreshTickersUseCase<MockBackend>,
    );

    fn fixture() -> Fixture {
        fixture_with_delay(Duration::ZERO)
    }

    fn fixture_with_delay(delay: Duration) -> Fixture {
        let backend = Arc::new(MockBackend::default());
        *backend.positions.lock() = vec![
            Position::stock(Symbol::new("AAPL"), dec!(300), dec!(150)),
            Position::stock(Symbol::new("MSFT"), dec!(100), dec!(400)),
        ];
        *backend.account.lock() = PortfolioAccount::with_cash(dec!(10000));
        backend
            .chains
            .lock()
            .insert(Symbol::new("AAPL"), chain(dec!(151)));
        backend
            .chains
            .lock()
            .insert(Symbol::new("MSFT"), chain(dec!(402)));
        let session = Arc::new(DashboardSession::new(SessionDefaults::default()));
        let use_case =
            RefreshTickersUseCase::new(Arc::clone(&backend), Arc::clone(&session), delay);
        (backend, session, use_case)
    }

    #[tokio::test]
    async fn load_portfolio_seeds_session() {
        let (_backend, session, use_case) = fixture();

        match use_case.load_portfolio().await {
            Ok(()) => {}
            Err(e) => panic!("load failed: {e}"),
        }

        assert_eq!(session.symbols().len(), 2);
        assert_eq!(session.account().cash_balance, dec!(10000));
        assert!(!session.is_in_flight(&SessionAction::LoadPortfolio));
    }

    #[tokio::test]
    async fn refresh_ticker_replaces_both_sides() {
        let (backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();

        let aapl = Symbol::new("AAPL");
        use_case.refresh_ticker(&aapl, None).await.unwrap();

        let snapshot = session.snapshot(&aapl).unwrap();
        assert_eq!(snapshot.stock_price, dec!(151));
        assert_eq!(snapshot.calls.len(), 1);
        assert_eq!(snapshot.puts.len(), 1);
        let queries = backend.chain_queries.lock();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].option_type, Some(OptionType::Call));
        assert_eq!(queries[1].option_type, Some(OptionType::Put));
    }

    #[tokio::test]
    async fn refresh_passes_expiration_filter() {
        let (backend, _session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();
        let expiration = Expiration::parse("2025-01-17").unwrap();

        use_case
            .refresh_ticker(&Symbol::new("AAPL"), Some(expiration))
            .await
            .unwrap();

        assert!(
            backend
                .chain_queries
                .lock()
                .iter()
                .all(|q| q.expiration == Some(expiration))
        );
    }

    #[tokio::test]
    async fn custom_ticker_fetches_puts_only() {
        let (backend, session, use_case) = fixture();
        let tsla = Symbol::new("TSLA");
        session.add_custom(tsla.clone()).unwrap();
        backend.chains.lock().insert(tsla.clone(), chain(dec!(190)));

        use_case.refresh_ticker(&tsla, None).await.unwrap();

        let queries = backend.chain_queries.lock();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].option_type, Some(OptionType::Put));
        assert!(session.snapshot(&tsla).unwrap().calls.is_empty());
    }

    #[tokio::test]
    async fn refresh_all_continues_past_failures() {
        let (backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();
        backend.failing_chains.lock().insert(Symbol::new("AAPL"));

        let outcome = use_case.refresh_all(None).await.unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failures[0].item, "AAPL");
        assert_eq!(
            session.snapshot(&Symbol::new("MSFT")).unwrap().stock_price,
            dec!(402)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_all_spaces_tickers_and_survives_a_failure() {
        let delay = Duration::from_millis(250);
        let (backend, session, use_case) = fixture_with_delay(delay);
        use_case.load_portfolio().await.unwrap();
        let tsla = Symbol::new("TSLA");
        session.add_custom(tsla.clone()).unwrap();
        backend.chains.lock().insert(tsla.clone(), chain(dec!(190)));
        backend.failing_chains.lock().insert(Symbol::new("MSFT"));

        let outcome = use_case.refresh_all(None).await.unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failures[0].item, "MSFT");
        let order: Vec<Symbol> = backend
            .chain_queries
            .lock()
            .iter()
            .map(|q| q.symbol.clone())
            .collect();
        let aapl = Symbol::new("AAPL");
        assert_eq!(order, [aapl.clone(), aapl, Symbol::new("MSFT"), tsla.clone()]);
        assert_eq!(session.snapshot(&tsla).unwrap().stock_price, dec!(190));

        let at: Vec<_> = backend.timeline.lock().iter().map(|(_, t)| *t).collect();
        // Both sides of one ticker go out back to back.
        assert!(at[1] - at[0] < delay);
        assert!(at[2] - at[1] >= delay);
        assert!(at[3] - at[2] >= delay);
    }

    #[tokio::test]
    async fn refresh_all_rejects_duplicate() {
        let (_backend, session, use_case) = fixture();
        let _held = session.begin(SessionAction::RefreshAll).unwrap();

        let Err(err) = use_case.refresh_all(None).await else {
            panic!("duplicate bulk refresh should be rejected");
        };
        assert_eq!(err, SessionError::ActionInFlight(SessionAction::RefreshAll));
    }

    #[tokio::test]
    async fn refresh_all_skips_ticker_refreshing_on_its_own() {
        let (backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();
        let aapl = Symbol::new("AAPL");
        let _single = session.begin(SessionAction::RefreshTicker(aapl.clone())).unwrap();

        let outcome = use_case.refresh_all(None).await.unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failures[0].item, "AAPL");
        assert!(backend.chain_queries.lock().iter().all(|q| q.symbol != aapl));
        assert!(session.is_in_flight(&SessionAction::RefreshTicker(aapl)));
    }

    #[tokio::test]
    async fn refresh_ticker_rejected_while_bulk_holds_it() {
        let (_backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();
        let aapl = Symbol::new("AAPL");
        let _bulk_item = session.begin(SessionAction::RefreshTicker(aapl.clone())).unwrap();

        let result = use_case.refresh_ticker(&aapl, None).await;

        assert!(matches!(
            result,
            Err(RefreshError::Session(SessionError::ActionInFlight(
                SessionAction::RefreshTicker(_)
            )))
        ));
    }

    #[tokio::test]
    async fn refresh_all_releases_item_claims() {
        let (_backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();

        use_case.refresh_all(None).await.unwrap();

        for symbol in session.symbols() {
            assert!(!session.is_in_flight(&SessionAction::RefreshTicker(symbol)));
        }
        assert!(!session.is_in_flight(&SessionAction::RefreshAll));
    }

    #[tokio::test]
    async fn refresh_unknown_ticker_fails() {
        let (_backend, _session, use_case) = fixture();

        let result = use_case.refresh_ticker(&Symbol::new("NVDA"), None).await;

        assert!(matches!(
            result,
            Err(RefreshError::Session(SessionError::UnknownTicker(_)))
        ));
    }

    #[tokio::test]
    async fn refresh_prices_updates_tracked_tickers() {
        let (backend, session, use_case) = fixture();
        use_case.load_portfolio().await.unwrap();
        backend.prices.lock().insert(Symbol::new("AAPL"), dec!(155));

        let updated = use_case.refresh_prices().await.unwrap();

        assert_eq!(updated, 1);
        assert_eq!(
            session.snapshot(&Symbol::new("AAPL")).unwrap().stock_price,
            dec!(155)
        );
    }
}

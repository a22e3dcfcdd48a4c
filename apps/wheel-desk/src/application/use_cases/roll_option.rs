//! Roll Option Use Case
//!
//! Drives the roll session through the backend: load expirations for the
//! selected position, fetch the replacement chain, then submit the linked
//! buy-to-close / sell-to-open pair.
//!
//! The session lock is taken only between awaits.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::{BackendError, ChainQuery, RolloverReceipt, WheelBackendPort};
use crate::application::services::{DashboardSession, SessionAction, SessionError};
use crate::domain::option_chain::Expiration;
use crate::domain::portfolio::Position;
use crate::domain::rollover::{RolloverError, RolloverSuggestion};

/// Errors from the roll workflow.
#[derive(Debug, Error)]
pub enum RollOptionError {
    /// Illegal step or no usable candidate.
    #[error(transparent)]
    Rollover(#[from] RolloverError),

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Rejected by the session.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Use case for rolling a short option.
pub struct RollOptionUseCase<B>
where
    B: WheelBackendPort,
{
    backend: Arc<B>,
    session: Arc<DashboardSession>,
}

impl<B> RollOptionUseCase<B>
where
    B: WheelBackendPort,
{
    /// Create a new RollOptionUseCase.
    pub const fn new(backend: Arc<B>, session: Arc<DashboardSession>) -> Self {
        Self { backend, session }
    }

    /// Select a position and resolve its default target expiration.
    ///
    /// A failed expiration listing is not an error: the target falls back
    /// to the held expiration plus the configured offset.
    ///
    /// # Errors
    ///
    /// Returns `Rollover` if the position is not a short option or a roll
    /// call is outstanding.
    pub async fn start(&self, position: Position) -> Result<Expiration, RollOptionError> {
        let _guard = self.session.begin(SessionAction::RolloverFetch)?;
        let symbol = position.symbol.clone();
        let stock_price = self.stock_price(&position).await;
        self.session
            .rollover()
            .select_position(position, stock_price)?;

        let listed = match self.backend.get_expirations(&symbol).await {
            Ok(descriptors) => Some(descriptors.into_iter().map(|d| d.value).collect()),
            Err(e) => {
                tracing::warn!(
                    symbol = %symbol,
                    error = %e,
                    "Expiration listing failed, using offset"
                );
                None
            }
        };
        let target = self.session.rollover().expirations_loaded(listed)?;
        tracing::info!(symbol = %symbol, target = %target, "Roll target expiration resolved");
        Ok(target)
    }

    /// Fetch the replacement chain and build a suggestion.
    ///
    /// `otm_pct` and `expiration` override the session values when given.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the chain fetch fails and `Rollover` if no
    /// candidate or no priced order pair can be built; both leave the
    /// session in its error phase.
    pub async fn suggest(
        &self,
        otm_pct: Option<Decimal>,
        expiration: Option<Expiration>,
    ) -> Result<RolloverSuggestion, RollOptionError> {
        let _guard = self.session.begin(SessionAction::RolloverFetch)?;
        let request = {
            let mut roll = self.session.rollover();
            if let Some(otm_pct) = otm_pct {
                roll.set_otm_pct(otm_pct)?;
            }
            if let Some(expiration) = expiration {
                roll.set_target_expiration(expiration)?;
            }
            roll.begin_fetch()?
        };

        let query = ChainQuery::new(request.symbol.clone(), request.otm_pct, request.option_type)
            .with_expiration(request.expiration);
        match self.backend.get_option_chain(&query).await {
            Ok(mut chains) => {
                let chain = chains.remove(&request.symbol).unwrap_or_default();
                let mut roll = self.session.rollover();
                let suggestion = roll
                    .fetch_succeeded(Some(chain.stock_price), chain.quotes(request.option_type))?
                    .clone();
                tracing::info!(
                    symbol = %request.symbol,
                    strike = %suggestion.candidate.replacement_strike,
                    expiration = %suggestion.candidate.target_expiration,
                    "Roll candidate selected"
                );
                Ok(suggestion)
            }
            Err(e) => {
                self.session.rollover().fetch_failed(e.to_string())?;
                Err(e.into())
            }
        }
    }

    /// Submit the suggested pair as one backend request.
    ///
    /// # Errors
    ///
    /// Returns `Rollover` if nothing is suggested and `Backend` if the
    /// submit fails, which leaves the session in its error phase.
    pub async fn submit(&self) -> Result<RolloverReceipt, RollOptionError> {
        let _guard = self.session.begin(SessionAction::RolloverSubmit)?;
        let pair = self.session.rollover().begin_submit()?;

        match self.backend.submit_rollover(&pair).await {
            Ok(receipt) => {
                self.session.rollover().submit_succeeded()?;
                tracing::info!(
                    ticker = %pair.buy_to_close.contract.ticker,
                    buy_order_id = %receipt.buy_order_id,
                    sell_order_id = %receipt.sell_order_id,
                    "Rollover submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "Rollover submit failed");
                self.session.rollover().submit_failed(e.to_string())?;
                Err(e.into())
            }
        }
    }

    /// Leave the error phase so the user can fetch again.
    ///
    /// # Errors
    ///
    /// Returns `Rollover` unless the session is in error.
    pub fn retry(&self) -> Result<(), RollOptionError> {
        self.session.rollover().retry()?;
        Ok(())
    }

    /// Drop the current selection.
    pub fn cancel(&self) {
        self.session.rollover().reset();
    }

    async fn stock_price(&self, position: &Position) -> Decimal {
        let tracked = self
            .session
            .snapshot(&position.symbol)
            .map(|s| s.stock_price)
            .filter(|p| *p > Decimal::ZERO);
        if let Some(price) = tracked {
            return price;
        }
        match self
            .backend
            .get_stock_prices(std::slice::from_ref(&position.symbol))
            .await
        {
            Ok(prices) => prices.get(&position.symbol).copied().unwrap_or_default(),
            Err(e) => {
                tracing::warn!(symbol = %position.symbol, error = %e, "Stock price lookup failed");
                Decimal::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TickerChain;
    use crate::application::ports::mock_backend::MockBackend;
    use crate::application::services::SessionDefaults;
    use crate::domain::option_chain::{ExpirationDescriptor, OptionQuote, OptionType};
    use crate::domain::portfolio::OptionDetails;
    use crate::domain::rollover::RolloverPhase;
    use crate::domain::shared::{OrderId, Symbol};
    use rust_decimal_macros::dec;

    fn exp(value: &str) -> Expiration {
        Expiration::parse(value).unwrap()
    }

    fn short_call() -> Position {
        Position::option(
            Symbol::new("AAPL"),
            dec!(-3),
            OptionDetails::new(dec!(160), exp("2025-01-17"), OptionType::Call)
                .with_quote(dec!(2.10), dec!(2.30)),
        )
    }

    fn fixture() -> (Arc<MockBackend>, Arc<DashboardSession>, RollOptionUseCase<MockBackend>) {
        let backend = Arc::new(MockBackend::default());
        *backend.expirations.lock() = Some(vec![
            ExpirationDescriptor::new(exp("2025-01-17")),
            ExpirationDescriptor::new(exp("2025-01-24")),
            ExpirationDescriptor::new(exp("2025-01-31")),
        ]);
        backend.prices.lock().insert(Symbol::new("AAPL"), dec!(150));
        let calls = [dec!(160), dec!(165), dec!(170)]
            .into_iter()
            .map(|s| OptionQuote::new(s, dec!(1.00), dec!(1.20)).with_expiration(exp("2025-01-24")))
            .collect();
        backend.chains.lock().insert(
            Symbol::new("AAPL"),
            TickerChain {
                stock_price: dec!(150),
                position: Decimal::ZERO,
                calls,
                puts: vec![],
            },
        );
        let session = Arc::new(DashboardSession::new(SessionDefaults::default()));
        let use_case = RollOptionUseCase::new(Arc::clone(&backend), Arc::clone(&session));
        (backend, session, use_case)
    }

    #[tokio::test]
    async fn full_roll_flow_submits_linked_pair() {
        let (backend, session, use_case) = fixture();

        let target = use_case.start(short_call()).await.unwrap();
        assert_eq!(target, exp("2025-01-24"));

        let suggestion = use_case.suggest(None, None).await.unwrap();
        assert_eq!(suggestion.candidate.replacement_strike, dec!(165));
        assert_eq!(suggestion.orders.buy_to_close.limit_price_per_contract, dec!(230));
        assert_eq!(suggestion.orders.sell_to_open.limit_price_per_unit, dec!(1.10));

        let receipt = use_case.submit().await.unwrap();
        assert_eq!(receipt.buy_order_id, OrderId::new(101));
        assert_eq!(receipt.sell_order_id, OrderId::new(102));
        assert_eq!(backend.rollovers.lock().len(), 1);
        assert_eq!(session.rollover().phase(), RolloverPhase::ReadyForFetch);
    }

    #[tokio::test]
    async fn expiration_failure_falls_back_to_offset() {
        let (backend, _session, use_case) = fixture();
        *backend.expirations.lock() = None;

        let target = use_case.start(short_call()).await.unwrap();

        assert_eq!(target, exp("2025-01-24"));
    }

    #[tokio::test]
    async fn stock_position_is_rejected() {
        let (_backend, _session, use_case) = fixture();
        let stock = Position::stock(Symbol::new("AAPL"), dec!(100), dec!(150));

        let result = use_case.start(stock).await;

        assert!(matches!(
            result,
            Err(RollOptionError::Rollover(RolloverError::InvalidPosition(_)))
        ));
    }

    #[tokio::test]
    async fn empty_chain_moves_session_to_error_and_retry_recovers() {
        let (backend, session, use_case) = fixture();
        backend.chains.lock().clear();
        use_case.start(short_call()).await.unwrap();

        let result = use_case.suggest(None, None).await;

        assert!(matches!(
            result,
            Err(RollOptionError::Rollover(RolloverError::NoCandidate { .. }))
        ));
        assert_eq!(session.rollover().phase(), RolloverPhase::Error);
        use_case.retry().unwrap();
        assert_eq!(session.rollover().phase(), RolloverPhase::ReadyForFetch);
    }

    #[tokio::test]
    async fn chain_fetch_failure_records_error() {
        let (backend, session, use_case) = fixture();
        backend.failing_chains.lock().insert(Symbol::new("AAPL"));
        use_case.start(short_call()).await.unwrap();

        let result = use_case.suggest(None, None).await;

        assert!(matches!(result, Err(RollOptionError::Backend(_))));
        let roll = session.rollover();
        assert_eq!(roll.phase(), RolloverPhase::Error);
        assert!(roll.last_error().is_some());
    }

    #[tokio::test]
    async fn otm_override_moves_target_strike() {
        let (_backend, _session, use_case) = fixture();
        use_case.start(short_call()).await.unwrap();

        let suggestion = use_case.suggest(Some(dec!(5)), None).await.unwrap();

        assert_eq!(suggestion.candidate.target_strike, dec!(157.5));
        assert_eq!(suggestion.candidate.replacement_strike, dec!(160));
    }

    #[tokio::test]
    async fn submit_failure_blocks_until_retry() {
        let (backend, session, use_case) = fixture();
        *backend.fail_rollover.lock() = true;
        use_case.start(short_call()).await.unwrap();
        use_case.suggest(None, None).await.unwrap();

        let result = use_case.submit().await;

        assert!(matches!(result, Err(RollOptionError::Backend(_))));
        assert_eq!(session.rollover().phase(), RolloverPhase::Error);
        let Err(err) = use_case.submit().await else {
            panic!("submit from the error phase should be rejected");
        };
        assert!(matches!(
            err,
            RollOptionError::Rollover(RolloverError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn submit_without_suggestion_is_rejected() {
        let (backend, _session, use_case) = fixture();

        let result = use_case.submit().await;

        assert!(matches!(result, Err(RollOptionError::Rollover(_))));
        assert!(backend.rollovers.lock().is_empty());
    }
}

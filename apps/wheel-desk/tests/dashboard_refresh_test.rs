//! Dashboard Refresh Tests
//!
//! Loads a portfolio from a mock backend, refreshes every tracked ticker
//! and checks the weekly earnings the dashboard would show.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wheel_desk::application::ports::InMemorySettingsStore;
use wheel_desk::application::services::{DashboardSession, PollerConfig, SessionDefaults};
use wheel_desk::infrastructure::backend::{BackendHttpConfig, HttpWheelBackend, RetryConfig};
use wheel_desk::{
    AppContainer, OptionQuote, PortfolioAccount, Symbol, TickerSettings, TickerSnapshot,
    compute_summary,
};

fn container(server: &MockServer) -> AppContainer<HttpWheelBackend, InMemorySettingsStore> {
    let config = BackendHttpConfig::new(format!("{}/api", server.uri()))
        .with_retry(RetryConfig::none());
    AppContainer::new(
        Arc::new(HttpWheelBackend::new(&config).unwrap()),
        Arc::new(InMemorySettingsStore::new()),
        Arc::new(DashboardSession::new(SessionDefaults::default())),
        PollerConfig::default(),
        Duration::ZERO,
    )
}

async fn mount_chain(
    server: &MockServer,
    ticker: &str,
    side: &str,
    price: f64,
    quote: serde_json::Value,
) {
    let (calls, puts) = if side == "CALL" {
        (vec![quote], vec![])
    } else {
        (vec![], vec![quote])
    };
    Mock::given(method("GET"))
        .and(path("/api/options/otm"))
        .and(query_param("tickers", ticker))
        .and(query_param("optionType", side))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {ticker: {"stock_price": price, "calls": calls, "puts": puts}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_all_builds_weekly_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/portfolio/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "positions": [
                {"symbol": "AAPL", "position": 300, "market_price": 150.0, "security_type": "STK"},
                {"symbol": "MSFT", "position": 50, "market_price": 400.0, "security_type": "STK"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/portfolio/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cash_balance": 10000.0, "account_value": 0
        })))
        .mount(&server)
        .await;

    let aapl_call = json!({"strike": 165.0, "bid": 1.2, "ask": 1.25});
    let aapl_put = json!({"strike": 135.0, "bid": 0.95, "ask": 1.0});
    let tsla_put = json!({"strike": 190.0, "bid": 2.4, "ask": 2.5});
    mount_chain(&server, "AAPL", "CALL", 150.0, aapl_call).await;
    mount_chain(&server, "AAPL", "PUT", 150.0, aapl_put).await;
    mount_chain(&server, "TSLA", "PUT", 200.0, tsla_put).await;
    Mock::given(method("GET"))
        .and(path("/api/options/otm"))
        .and(query_param("tickers", "TSLA"))
        .and(query_param("optionType", "CALL"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/options/otm"))
        .and(query_param("tickers", "MSFT"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "no market data"})))
        .mount(&server)
        .await;

    let container = container(&server);
    container
        .manage_tickers_use_case()
        .add_custom("tsla")
        .await
        .unwrap();
    let refresh = container.refresh_tickers_use_case();
    refresh.load_portfolio().await.unwrap();

    let outcome = refresh.refresh_all(None).await.unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.failures[0].item, "MSFT");
    assert!(outcome.failures[0].error.contains("no market data"));

    let tsla = container.session().snapshot(&Symbol::new("TSLA")).unwrap();
    assert!(tsla.is_custom);
    assert_eq!(tsla.stock_price, dec!(200));

    let summary = container.session().summary();
    // AAPL: 1.25 × 100 × 3 calls
    assert_eq!(summary.total_weekly_call_premium, dec!(375));
    // AAPL 1.00 × 100 × 3 + TSLA 2.50 × 100 × 1
    assert_eq!(summary.total_weekly_put_premium, dec!(550));
    assert_eq!(summary.total_weekly_premium, dec!(925));
    assert_eq!(summary.total_put_exercise_cost, dec!(59500));
    // MSFT is an odd lot; custom tickers carry no stock value.
    assert_eq!(summary.portfolio_stock_value, dec!(45000));
    assert_eq!(summary.total_portfolio_value, dec!(55000));
    assert_eq!(summary.projected_annual_earnings, dec!(48100));
    assert_eq!(summary.weekly_return_pct.round_dp(2), dec!(1.68));
    assert_eq!(summary.tickers.len(), 2);
}

#[tokio::test]
async fn refresh_prices_updates_tracked_tickers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/portfolio/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "AAPL", "position": 100, "market_price": 150.0, "security_type": "STK"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/portfolio/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/options/stock-price"))
        .and(query_param("tickers", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"AAPL": "152.5"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let container = container(&server);
    let refresh = container.refresh_tickers_use_case();
    refresh.load_portfolio().await.unwrap();

    assert_eq!(refresh.refresh_prices().await.unwrap(), 1);
    let aapl = container.session().snapshot(&Symbol::new("AAPL")).unwrap();
    assert_eq!(aapl.stock_price, dec!(152.5));
}

#[tokio::test]
async fn failed_portfolio_load_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/portfolio/positions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let container = container(&server);
    assert!(
        container
            .refresh_tickers_use_case()
            .load_portfolio()
            .await
            .is_err()
    );
    assert!(container.session().symbols().is_empty());
    assert!(container.session().positions().is_empty());
}

fn held(shares: Decimal) -> TickerSnapshot {
    TickerSnapshot::new(Symbol::new("AAPL"))
        .with_position(dec!(100), shares)
        .with_calls(vec![OptionQuote::new(dec!(110), dec!(0.80), dec!(1.00))])
        .with_puts(vec![OptionQuote::new(dec!(90), dec!(0.40), dec!(0.50))])
}

#[test_case(dec!(99), dec!(0), dec!(0) ; "odd lot sits out")]
#[test_case(dec!(100), dec!(100), dec!(50) ; "one round lot")]
#[test_case(dec!(250), dec!(200), dec!(100) ; "partial lot truncates")]
fn contracts_follow_round_lots(shares: Decimal, call_premium: Decimal, put_premium: Decimal) {
    let summary = compute_summary(&[held(shares)], &PortfolioAccount::default());
    assert_eq!(summary.total_weekly_call_premium, call_premium);
    assert_eq!(summary.total_weekly_put_premium, put_premium);
}

#[test_case(None, dec!(150) ; "defaults to covered contracts")]
#[test_case(Some(5), dec!(250) ; "explicit put quantity")]
fn put_quantity_setting(quantity: Option<u32>, put_premium: Decimal) {
    let settings = quantity.map_or_else(TickerSettings::default, |q| {
        TickerSettings::default().with_put_quantity(q)
    });
    let snapshot = held(dec!(300)).with_settings(settings);
    let summary = compute_summary(&[snapshot], &PortfolioAccount::default());
    assert_eq!(summary.total_weekly_put_premium, put_premium);
}

#[test]
fn empty_dashboard_is_all_zero() {
    let summary = compute_summary(&[], &PortfolioAccount::default());
    assert_eq!(summary.total_weekly_premium, Decimal::ZERO);
    assert_eq!(summary.total_portfolio_value, Decimal::ZERO);
    assert_eq!(summary.weekly_return_pct, Decimal::ZERO);
    assert_eq!(summary.projected_annual_return_pct, Decimal::ZERO);
}

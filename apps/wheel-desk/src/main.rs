//! Wheel Desk CLI
//!
//! One-shot commands against the assistant backend. Results are printed
//! to stdout as JSON; logs go to stderr.
//!
//! # Configuration
//!
//! - `--config` / `WHEEL_DESK_CONFIG`: YAML config path (default `config.yaml`)
//! - `RUST_LOG`: overrides the configured log filter
//! - `.env` files are loaded before the config is read

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use wheel_desk::application::ports::{OrderQuery, WheelBackendPort};
use wheel_desk::config::load_config;
use wheel_desk::domain::option_chain::{Expiration, closest_friday, next_monthly_expiration};
use wheel_desk::domain::portfolio::weekly_option_income;
use wheel_desk::telemetry::init_tracing;
use wheel_desk::{HttpContainer, OptionType, OrderId, Position, Symbol};

#[derive(Debug, Parser)]
#[command(name = "wheel-desk", version, about = "Wheel strategy options assistant")]
struct Cli {
    /// Configuration file.
    #[arg(short, long, env = "WHEEL_DESK_CONFIG", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh every ticker and print the portfolio earnings summary.
    Summary(ChainArgs),
    /// Refresh every ticker and print the ticker snapshots.
    Refresh(ChainArgs),
    /// Short options expiring by this Friday and their income.
    WeeklyIncome,
    /// Roll a short option to a later expiration.
    #[command(subcommand)]
    Roll(RollCommand),
    /// Backend order management.
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Tracked ticker management.
    #[command(subcommand)]
    Tickers(TickersCommand),
}

#[derive(Debug, Clone, Args)]
struct ChainArgs {
    /// Expiration filter (YYYYMMDD or YYYY-MM-DD); defaults to the closest Friday.
    #[arg(long, conflicts_with = "monthly")]
    expiration: Option<Expiration>,
    /// Use the next monthly expiration as the filter.
    #[arg(long)]
    monthly: bool,
}

impl ChainArgs {
    fn resolve(&self) -> Expiration {
        let today = Local::now().date_naive();
        match (self.expiration, self.monthly) {
            (Some(expiration), _) => expiration,
            (None, true) => next_monthly_expiration(today),
            (None, false) => closest_friday(today),
        }
    }
}

#[derive(Debug, Subcommand)]
enum RollCommand {
    /// Print the suggested replacement and order pair.
    Suggest(RollArgs),
    /// Submit the suggested order pair.
    Submit(RollArgs),
}

#[derive(Debug, Clone, Args)]
struct RollArgs {
    /// Underlying ticker of the held short option.
    symbol: String,
    /// Held strike, when more than one short option is open.
    #[arg(long)]
    strike: Option<Decimal>,
    /// Held expiration, when more than one short option is open.
    #[arg(long)]
    expiration: Option<Expiration>,
    /// Held option type, when more than one short option is open.
    #[arg(long = "type")]
    option_type: Option<OptionType>,
    /// OTM target in percent for the replacement.
    #[arg(long)]
    otm: Option<Decimal>,
    /// Replacement expiration instead of the next listed one.
    #[arg(long)]
    target: Option<Expiration>,
}

#[derive(Debug, Subcommand)]
enum OrdersCommand {
    /// List pending or executed orders.
    List {
        /// List executed orders.
        #[arg(long)]
        executed: bool,
        /// Only rollover legs (`true`) or only plain orders (`false`).
        #[arg(long)]
        rollover: Option<bool>,
    },
    /// Save one SELL order per ticker from the refreshed chains.
    SaveOpportunities {
        /// Side to sell.
        #[arg(long, default_value = "PUT")]
        side: OptionType,
        #[command(flatten)]
        chain: ChainArgs,
    },
    /// Execute every pending order, then optionally watch statuses.
    ExecuteAll {
        /// Poll statuses until every order is terminal.
        #[arg(long)]
        watch: bool,
    },
    /// Cancel an order.
    Cancel {
        /// Order id.
        id: i64,
    },
    /// Delete an order record.
    Delete {
        /// Order id.
        id: i64,
    },
    /// Change a pending order's contract count.
    Quantity {
        /// Order id.
        id: i64,
        /// New contract count.
        quantity: u32,
    },
    /// Poll order statuses until every order is terminal.
    Watch,
}

#[derive(Debug, Subcommand)]
enum TickersCommand {
    /// Track a ticker without shares.
    Add {
        /// Ticker symbol.
        ticker: String,
    },
    /// Stop tracking a custom ticker.
    Remove {
        /// Ticker symbol.
        ticker: String,
    },
    /// Hide a portfolio ticker.
    Exclude {
        /// Ticker symbol.
        ticker: String,
    },
    /// Show a hidden portfolio ticker again.
    Include {
        /// Ticker symbol.
        ticker: String,
    },
    /// Change a ticker's OTM targets or put quantity.
    Settings {
        /// Ticker symbol.
        ticker: String,
        /// Call OTM percent.
        #[arg(long)]
        call_otm: Option<Decimal>,
        /// Put OTM percent.
        #[arg(long)]
        put_otm: Option<Decimal>,
        /// Explicit put contract count.
        #[arg(long)]
        put_quantity: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("wheel-desk: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.observability.logging);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("wheel-desk: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    let Ok(mut dir) = std::env::current_dir() else {
        return;
    };
    while dir.pop() {
        let candidate: PathBuf = dir.join(".env");
        if candidate.is_file() {
            let _ = dotenvy::from_path(&candidate);
            return;
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, config: &wheel_desk::config::Config) -> anyhow::Result<()> {
    let container = HttpContainer::from_config(config).await?;

    match command {
        Command::Summary(chain) => {
            let outcome = refresh(&container, &chain).await?;
            if !outcome.is_complete_success() {
                tracing::warn!(failed = outcome.failed, "Some tickers failed to refresh");
            }
            print_json(&container.session().summary())
        }
        Command::Refresh(chain) => {
            let outcome = refresh(&container, &chain).await?;
            print_json(&serde_json::json!({
                "outcome": outcome,
                "tickers": container.session().snapshots(),
            }))
        }
        Command::WeeklyIncome => {
            let positions = container.backend().get_positions().await?;
            print_json(&weekly_option_income(
                &positions,
                Local::now().date_naive(),
            ))
        }
        Command::Roll(roll) => run_roll(&container, roll).await,
        Command::Orders(orders) => run_orders(&container, orders).await,
        Command::Tickers(tickers) => run_tickers(&container, tickers).await,
    }
}

async fn refresh(
    container: &HttpContainer,
    chain: &ChainArgs,
) -> anyhow::Result<wheel_desk::application::BulkOutcome> {
    let refresh = container.refresh_tickers_use_case();
    refresh.load_portfolio().await?;
    Ok(refresh.refresh_all(Some(chain.resolve())).await?)
}

fn select_position(positions: Vec<Position>, args: &RollArgs) -> anyhow::Result<Position> {
    let symbol = Symbol::parse(&args.symbol)?;
    let mut matching: Vec<Position> = positions
        .into_iter()
        .filter(|p| p.symbol == symbol && p.is_short_option())
        .filter(|p| {
            p.option.as_ref().is_some_and(|o| {
                args.strike.is_none_or(|s| s == o.strike)
                    && args.expiration.is_none_or(|e| e == o.expiration)
                    && args.option_type.is_none_or(|t| t == o.option_type)
            })
        })
        .collect();

    match matching.len() {
        0 => bail!("no short option position matches {symbol}"),
        1 => Ok(matching.remove(0)),
        n => bail!(
            "{n} short option positions match {symbol}; \
             narrow with --strike, --expiration or --type"
        ),
    }
}

async fn run_roll(container: &HttpContainer, command: RollCommand) -> anyhow::Result<()> {
    let (args, submit) = match command {
        RollCommand::Suggest(args) => (args, false),
        RollCommand::Submit(args) => (args, true),
    };

    let refresh = container.refresh_tickers_use_case();
    refresh.load_portfolio().await?;
    let position = select_position(container.session().positions(), &args)?;

    let roll = container.roll_option_use_case();
    roll.start(position).await?;
    let suggestion = roll.suggest(args.otm, args.target).await?;

    if !submit {
        return print_json(&suggestion);
    }

    let receipt = roll
        .submit()
        .await
        .context("rollover submission failed")?;
    print_json(&serde_json::json!({
        "suggestion": suggestion,
        "receipt": receipt,
    }))
}

async fn run_orders(container: &HttpContainer, command: OrdersCommand) -> anyhow::Result<()> {
    let orders = container.manage_orders_use_case();

    match command {
        OrdersCommand::List { executed, rollover } => {
            let mut query = if executed {
                OrderQuery::executed()
            } else {
                OrderQuery::pending()
            };
            if let Some(is_rollover) = rollover {
                query = query.rollover(is_rollover);
            }
            print_json(&orders.list(query).await?)
        }
        OrdersCommand::SaveOpportunities { side, chain } => {
            refresh(container, &chain).await?;
            let outcome = container
                .submit_orders_use_case()
                .save_opportunities(side)
                .await?;
            print_json(&outcome)
        }
        OrdersCommand::ExecuteAll { watch } => {
            let outcome = container.submit_orders_use_case().execute_all().await?;
            print_json(&outcome)?;
            if watch && outcome.succeeded > 0 {
                watch_orders(container).await?;
            }
            Ok(())
        }
        OrdersCommand::Cancel { id } => {
            orders.cancel(OrderId::new(id)).await?;
            print_json(&serde_json::json!({ "canceled": id }))
        }
        OrdersCommand::Delete { id } => {
            orders.delete(OrderId::new(id)).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        OrdersCommand::Quantity { id, quantity } => {
            orders.update_quantity(OrderId::new(id), quantity).await?;
            print_json(&serde_json::json!({ "order_id": id, "quantity": quantity }))
        }
        OrdersCommand::Watch => watch_orders(container).await,
    }
}

/// Print each batch of status changes until polling finishes or Ctrl-C.
async fn watch_orders(container: &HttpContainer) -> anyhow::Result<()> {
    let poller = container.poller();
    let mut updates = poller.subscribe();
    poller.ensure_started();

    let finished = poller.stopped();
    tokio::pin!(finished);

    loop {
        tokio::select! {
            received = updates.recv() => match received {
                Ok(batch) => print_json(&batch)?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Status updates dropped");
                }
                Err(RecvError::Closed) => break,
            },
            () = &mut finished => {
                while let Ok(batch) = updates.try_recv() {
                    print_json(&batch)?;
                }
                break;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                poller.stop();
                break;
            }
        }
    }
    Ok(())
}

async fn run_tickers(container: &HttpContainer, command: TickersCommand) -> anyhow::Result<()> {
    let tickers = container.manage_tickers_use_case();
    let session = container.session();

    match command {
        TickersCommand::Add { ticker } => {
            let symbol = tickers.add_custom(&ticker).await?;
            print_json(&serde_json::json!({ "added": symbol }))
        }
        TickersCommand::Remove { ticker } => {
            let symbol = Symbol::parse(&ticker)?;
            tickers.remove_custom(&symbol).await?;
            print_json(&serde_json::json!({ "removed": symbol }))
        }
        TickersCommand::Exclude { ticker } => {
            let symbol = Symbol::parse(&ticker)?;
            tickers.exclude(symbol.clone()).await?;
            print_json(&serde_json::json!({ "excluded": symbol }))
        }
        TickersCommand::Include { ticker } => {
            let symbol = Symbol::parse(&ticker)?;
            tickers.include(&symbol).await?;
            print_json(&serde_json::json!({ "included": symbol }))
        }
        TickersCommand::Settings {
            ticker,
            call_otm,
            put_otm,
            put_quantity,
        } => {
            let symbol = Symbol::parse(&ticker)?;
            let mut settings = session.settings_for(&symbol);
            if let Some(call_otm) = call_otm {
                settings.call_otm_pct = call_otm;
            }
            if let Some(put_otm) = put_otm {
                settings.put_otm_pct = put_otm;
            }
            if put_quantity.is_some() {
                settings.put_quantity = put_quantity;
            }
            tickers.update_settings(&symbol, settings).await?;
            print_json(&serde_json::json!({ "ticker": symbol, "settings": settings }))
        }
    }
}

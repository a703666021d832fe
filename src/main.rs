mod config;
mod engine;
mod error;
mod exchange;
mod indicator;
mod model;
mod notifier;
mod report;
mod scheduler;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, MarketConfig};
use error::CycleError;
use exchange::Exchange;
use exchange::binance::BinanceExchange;
use model::TimeFrame;
use notifier::Notifier;
use notifier::telegram::TelegramNotifier;
use notifier::terminal::TerminalNotifier;

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("exchange error")]
    Exchange,
    #[display("notifier error")]
    Notifier,
    #[display("runtime error")]
    Runtime,
}

#[derive(Parser)]
#[command(name = "trend-notifier", about = "Periodic MACD/RSI trend reporter")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = config::load(Path::new(&cli.config)).change_context(AppError::Config)?;

    init_tracing(&config);

    let timeframe = config.market.timeframe().ok_or_else(|| {
        Report::new(AppError::Config).attach("market.interval did not survive validation")
    })?;

    let exchange: Arc<dyn Exchange> =
        Arc::new(BinanceExchange::new().change_context(AppError::Exchange)?);
    let notifier = build_notifier(&config).change_context(AppError::Notifier)?;

    info!(
        symbol = %config.market.symbol,
        interval = %timeframe,
        idle_seconds = config.scheduler.idle_seconds,
        notifier = notifier.name(),
        "starting trend notifier"
    );

    let idle = Duration::from_secs(config.scheduler.idle_seconds);
    let market = config.market.clone();
    let cancel = CancellationToken::new();

    let scheduler_handle = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            scheduler::run(idle, cancel, move || {
                let exchange = Arc::clone(&exchange);
                let notifier = Arc::clone(&notifier);
                let market = market.clone();
                async move { run_cycle(exchange.as_ref(), notifier.as_ref(), &market, timeframe).await }
            })
            .await;
        }
    });

    tokio::signal::ctrl_c()
        .await
        .change_context(AppError::Runtime)?;

    info!("ctrl+c received, shutting down");
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), scheduler_handle).await;

    info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

/// Credentials are read from the environment exactly once, here, and passed
/// into the notifier by value. Absence is not fatal at startup; publishing
/// fails cleanly instead.
fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, Report<error::NotifierError>> {
    match config.notifier.kind.as_str() {
        "terminal" => Ok(Arc::new(TerminalNotifier)),
        _ => {
            let token = std::env::var("BOT_TOKEN").unwrap_or_default();
            let chat_id = std::env::var("GROUP_ID").unwrap_or_default();
            if token.is_empty() || chat_id.is_empty() {
                tracing::warn!(
                    "BOT_TOKEN/GROUP_ID not set; publish attempts will fail until provided"
                );
            }
            Ok(Arc::new(TelegramNotifier::new(token, chat_id)?))
        }
    }
}

/// One fetch → compute → format → publish pass. Every failure is attached to
/// the step it occurred in and handled at the scheduler boundary.
async fn run_cycle(
    exchange: &dyn Exchange,
    notifier: &dyn Notifier,
    market: &MarketConfig,
    timeframe: TimeFrame,
) -> Result<(), Report<CycleError>> {
    let candles = exchange
        .fetch_candles(&market.symbol, timeframe, market.candle_limit)
        .await
        .change_context(CycleError::Fetch)?;

    let snapshot = engine::analyze(&candles).change_context(CycleError::Compute)?;
    let message = report::render(&market.symbol, &snapshot);

    notifier
        .publish(&message)
        .await
        .change_context(CycleError::Publish)?;

    info!(
        symbol = %market.symbol,
        close = snapshot.rounded().close,
        direction = %snapshot.rounded().direction(),
        "trend report published"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use error_stack::bail;
    use futures::future::BoxFuture;
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::{ExchangeError, NotifierError};
    use crate::model::Candle;

    struct FixedExchange {
        closes: Vec<f64>,
    }

    impl Exchange for FixedExchange {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fetch_candles(
            &self,
            symbol: &str,
            timeframe: TimeFrame,
            _limit: usize,
        ) -> BoxFuture<'_, Result<Vec<Candle>, Report<ExchangeError>>> {
            let symbol = symbol.to_owned();
            Box::pin(async move {
                let start = Utc::now();
                Ok(self
                    .closes
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| Candle {
                        symbol: symbol.clone(),
                        timeframe,
                        open_time: start + ChronoDuration::minutes(i as i64),
                        open: c,
                        high: c,
                        low: c,
                        close: c,
                        volume: 1.0,
                    })
                    .collect())
            })
        }
    }

    struct CapturingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for CapturingNotifier {
        fn name(&self) -> &'static str {
            "capturing"
        }

        fn publish<'a>(
            &'a self,
            text: &'a str,
        ) -> BoxFuture<'a, Result<(), Report<NotifierError>>> {
            Box::pin(async move {
                self.messages.lock().await.push(text.to_owned());
                Ok(())
            })
        }
    }

    struct FailingExchange;

    impl Exchange for FailingExchange {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn fetch_candles(
            &self,
            _symbol: &str,
            _timeframe: TimeFrame,
            _limit: usize,
        ) -> BoxFuture<'_, Result<Vec<Candle>, Report<ExchangeError>>> {
            Box::pin(async move {
                bail!(ExchangeError::Request {
                    exchange: "failing".into(),
                })
            })
        }
    }

    fn market() -> MarketConfig {
        MarketConfig {
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            candle_limit: 100,
        }
    }

    #[tokio::test]
    async fn cycle_publishes_rendered_report() {
        let exchange = FixedExchange {
            closes: (0..40).map(|i| 100.0 + i as f64).collect(),
        };
        let notifier = CapturingNotifier {
            messages: Mutex::new(Vec::new()),
        };

        run_cycle(&exchange, &notifier, &market(), TimeFrame::Min1)
            .await
            .unwrap();

        let messages = notifier.messages.lock().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("BTCUSDT"));
        assert!(messages[0].contains("LONG"));
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_as_fetch_cycle_error() {
        let notifier = CapturingNotifier {
            messages: Mutex::new(Vec::new()),
        };

        let err = run_cycle(&FailingExchange, &notifier, &market(), TimeFrame::Min1)
            .await
            .unwrap_err();
        assert!(matches!(err.current_context(), CycleError::Fetch));
        assert!(notifier.messages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn short_history_surfaces_as_compute_cycle_error() {
        let exchange = FixedExchange {
            closes: vec![100.0; 10],
        };
        let notifier = CapturingNotifier {
            messages: Mutex::new(Vec::new()),
        };

        let err = run_cycle(&exchange, &notifier, &market(), TimeFrame::Min1)
            .await
            .unwrap_err();
        assert!(matches!(err.current_context(), CycleError::Compute));
    }
}

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use serde::Deserialize;
use tracing::debug;

use crate::error::ExchangeError;
use crate::exchange::Exchange;
use crate::model::{Candle, TimeFrame};

const BINANCE_FUTURES_BASE_URL: &str = "https://fapi.binance.com";
const MAX_CANDLES_PER_REQUEST: usize = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Futures kline endpoint is weight 1-5 depending on limit; the REST limit
/// is 2400 weight/min. 20 req/s keeps a wide safety margin.
const BINANCE_REQUESTS_PER_SECOND: u32 = 20;

/// Binance USDT-M futures kline client.
pub struct BinanceExchange {
    client: reqwest::Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl BinanceExchange {
    pub fn new() -> Result<Self, Report<ExchangeError>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .change_context(ExchangeError::Request {
                exchange: "binance".into(),
            })?;

        let quota = Quota::per_second(nonzero!(BINANCE_REQUESTS_PER_SECOND));
        Ok(Self {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

impl Exchange for BinanceExchange {
    fn name(&self) -> &'static str {
        "binance"
    }

    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<Candle>, Report<ExchangeError>>> {
        let symbol = symbol.to_owned();
        Box::pin(async move {
            // Wait for rate limiter before making the request
            self.rate_limiter.until_ready().await;

            let url = format!("{}/fapi/v1/klines", BINANCE_FUTURES_BASE_URL);
            let interval = timeframe.binance_interval();
            let fetch_limit = limit.min(MAX_CANDLES_PER_REQUEST);

            let limit_str = fetch_limit.to_string();
            let params = [
                ("symbol", symbol.as_str()),
                ("interval", interval),
                ("limit", limit_str.as_str()),
            ];

            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .change_context(ExchangeError::Request {
                    exchange: "binance".into(),
                })?;

            if !response.status().is_success() {
                return Err(Report::new(ExchangeError::Request {
                    exchange: "binance".into(),
                })
                .attach(format!("HTTP status: {}", response.status())));
            }

            let raw: Vec<BinanceKlineRow> =
                response
                    .json()
                    .await
                    .change_context(ExchangeError::ResponseParse {
                        exchange: "binance".into(),
                    })?;

            debug!(
                symbol = %symbol,
                timeframe = %timeframe,
                fetched = raw.len(),
                "binance candle fetch complete"
            );

            let candles = raw
                .into_iter()
                .map(|row| row.into_candle(&symbol, timeframe))
                .collect();

            Ok(candles)
        })
    }
}

/// Binance kline row: 12-element array
/// [open_time, open, high, low, close, volume, close_time, ...]
#[derive(Debug, Deserialize)]
struct BinanceKlineRow(
    i64,                        // 0: open_time (ms)
    String,                     // 1: open
    String,                     // 2: high
    String,                     // 3: low
    String,                     // 4: close
    String,                     // 5: volume
    #[allow(dead_code)] i64,    // 6: close_time
    #[allow(dead_code)] String, // 7: quote asset volume
    #[allow(dead_code)] i64,    // 8: number of trades
    #[allow(dead_code)] String, // 9: taker buy base volume
    #[allow(dead_code)] String, // 10: taker buy quote volume
    #[allow(dead_code)] String, // 11: ignore
);

impl BinanceKlineRow {
    /// Convert to a candle. Numeric fields that fail to parse are coerced to
    /// `NaN` rather than failing the whole batch; the indicator engine drops
    /// rows with an unusable close.
    fn into_candle(self, symbol: &str, timeframe: TimeFrame) -> Candle {
        let coerce = |s: &str| -> f64 { s.parse::<f64>().unwrap_or(f64::NAN) };

        let open_time = DateTime::from_timestamp_millis(self.0).unwrap_or_else(Utc::now);

        Candle {
            symbol: symbol.to_owned(),
            timeframe,
            open_time,
            open: coerce(&self.1),
            high: coerce(&self.2),
            low: coerce(&self.3),
            close: coerce(&self.4),
            volume: coerce(&self.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(close: &str) -> BinanceKlineRow {
        BinanceKlineRow(
            1704067200000,
            "42000.0".into(),
            "43000.0".into(),
            "41500.0".into(),
            close.into(),
            "100.5".into(),
            1704067259999,
            "0".into(),
            10,
            "0".into(),
            "0".into(),
            "0".into(),
        )
    }

    #[test]
    fn kline_row_parses_into_candle() {
        let candle = row("42500.0").into_candle("BTCUSDT", TimeFrame::Min1);
        assert_eq!(candle.symbol, "BTCUSDT");
        assert_eq!(candle.open, 42000.0);
        assert_eq!(candle.close, 42500.0);
        assert_eq!(candle.volume, 100.5);
        assert_eq!(candle.open_time.timestamp_millis(), 1704067200000);
    }

    #[test]
    fn unparseable_close_coerced_to_nan() {
        let candle = row("not-a-number").into_candle("BTCUSDT", TimeFrame::Min1);
        assert!(candle.close.is_nan());
        // Other fields still parse
        assert_eq!(candle.open, 42000.0);
    }

    #[test]
    fn kline_json_array_deserializes() {
        let json = r#"[1704067200000,"42000.0","43000.0","41500.0","42500.0","100.5",1704067259999,"0",10,"0","0","0"]"#;
        let row: BinanceKlineRow = serde_json::from_str(json).unwrap();
        let candle = row.into_candle("BTCUSDT", TimeFrame::Min1);
        assert_eq!(candle.close, 42500.0);
    }

    /// Integration test: requires network access. Run with `cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn integration_fetch_candles() {
        let exchange = BinanceExchange::new().unwrap();
        let candles = exchange
            .fetch_candles("BTCUSDT", TimeFrame::Min1, 10)
            .await
            .unwrap();
        assert!(!candles.is_empty());
        assert!(candles.len() <= 10);
        // Oldest first
        for pair in candles.windows(2) {
            assert!(pair[0].open_time < pair[1].open_time);
        }
    }
}

//! Yahoo Finance market-data client

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::{HistoryRequest, Quote, StockSeries};
use async_trait::async_trait;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use yahoo_finance_api as yahoo;

use super::MarketDataProvider;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    rate_limiter: SharedRateLimiter,
    request_timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a new client honoring the rate limit and timeout in `config`
    pub fn new(config: &StockConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| StockError::ConfigError(format!("Yahoo Finance connector: {e}")))?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            connector,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            request_timeout: config.request_timeout,
        })
    }

    async fn fetch_quotes(&self, request: &HistoryRequest) -> Result<Vec<yahoo::Quote>> {
        let symbol = &request.symbol;

        let response = self
            .connector
            .get_quote_range(symbol, &request.interval, &request.period)
            .await
            .map_err(|e| StockError::unavailable(symbol, e))?;

        response
            .quotes()
            .map_err(|e| StockError::unavailable(symbol, e))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn history(&self, request: &HistoryRequest) -> Result<StockSeries> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(
            symbol = %request.symbol,
            period = %request.period,
            interval = %request.interval,
            "Requesting quote history"
        );

        let raw = tokio::time::timeout(self.request_timeout, self.fetch_quotes(request))
            .await
            .map_err(|_| StockError::unavailable(&request.symbol, "request timed out"))??;

        let quotes: Vec<Quote> = raw
            .iter()
            .filter_map(|q| {
                Some(Quote {
                    timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect();

        let series = StockSeries::new(request, quotes);
        if series.is_empty() {
            return Err(StockError::unavailable(&request.symbol, "no usable quotes returned"));
        }

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history() {
        let client = YahooFinanceClient::new(&StockConfig::default()).unwrap();
        let series = client
            .history(&HistoryRequest::new("AAPL", "1mo", "1d"))
            .await
            .unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert!(!series.is_empty());
        assert!(series.quotes.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history_unknown_symbol() {
        let client = YahooFinanceClient::new(&StockConfig::default()).unwrap();
        let result = client
            .history(&HistoryRequest::new("INVALID_SYMBOL_12345", "1mo", "1d"))
            .await;

        assert!(matches!(result, Err(StockError::DataUnavailable { .. })));
    }
}

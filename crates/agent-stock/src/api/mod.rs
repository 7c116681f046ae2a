//! Market-data providers

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::series::{HistoryRequest, StockSeries};
use async_trait::async_trait;

/// Source of historical price series
///
/// Implementations report an unknown ticker, an unreachable backend and an
/// empty result alike as [`StockError::DataUnavailable`](crate::StockError::DataUnavailable).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the history described by `request`
    async fn history(&self, request: &HistoryRequest) -> Result<StockSeries>;
}

//! Tool for fetching stock price history

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::MarketDataProvider;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::{HistoryRequest, INTERVALS, PERIODS};

/// Tool for fetching a ticker's price history
///
/// Returns the serialized series, or `null` when the provider has no data for
/// the ticker.
pub struct StockDataTool {
    provider: Arc<dyn MarketDataProvider>,
    config: Arc<StockConfig>,
}

#[derive(Debug, Deserialize)]
struct StockDataParams {
    symbol: String,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

impl StockDataTool {
    /// Create a new stock data tool
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: Arc<StockConfig>) -> Self {
        Self { provider, config }
    }

    async fn fetch_stock_data(&self, params: StockDataParams) -> Result<Value> {
        let request = HistoryRequest::new(
            params.symbol.to_uppercase(),
            params
                .period
                .unwrap_or_else(|| self.config.default_period.clone()),
            params
                .interval
                .unwrap_or_else(|| self.config.default_interval.clone()),
        );

        let fetched = self.provider.history(&request).await.map(|mut series| {
            let dropped = series.retain_finite();
            if dropped > 0 {
                tracing::warn!(symbol = %series.symbol, dropped, "Dropped bars without a finite close");
            }
            series
        });

        match fetched {
            Ok(series) if series.is_empty() => {
                tracing::warn!(symbol = %request.symbol, "Provider returned an empty series");
                Ok(Value::Null)
            }
            Ok(series) => {
                tracing::debug!(symbol = %series.symbol, points = series.len(), "Fetched series");
                Ok(serde_json::to_value(series)?)
            }
            Err(StockError::DataUnavailable { symbol, reason }) => {
                tracing::warn!(%symbol, %reason, "No data available");
                Ok(Value::Null)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Tool for StockDataTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StockDataParams = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::InvalidInput(format!("Invalid parameters: {e}"))
        })?;

        self.fetch_stock_data(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "stock_data"
    }

    fn description(&self) -> &'static str {
        "Fetch historical stock price data for a ticker over a period at a given interval. \
         Returns null when no data is available."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL', 'GOOGL')"
                },
                "period": {
                    "type": "string",
                    "description": "Time span of the history",
                    "enum": PERIODS,
                    "default": self.config.default_period
                },
                "interval": {
                    "type": "string",
                    "description": "Sampling interval of the history",
                    "enum": INTERVALS,
                    "default": self.config.default_interval
                }
            },
            "required": ["symbol"]
        })
    }
}

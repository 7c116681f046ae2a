//! Tool for comparing several tickers on one chart

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::MarketDataProvider;
use crate::chart::ChartRenderer;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::{HistoryRequest, SeriesStats, StockSeries};

/// Fetches each ticker in turn and plots the ones with data together
pub struct ComparisonTool {
    provider: Arc<dyn MarketDataProvider>,
    renderer: Arc<dyn ChartRenderer>,
    config: Arc<StockConfig>,
}

#[derive(Debug, Deserialize)]
struct ComparisonParams {
    symbols: Vec<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

/// Result of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Chart location, absent when no ticker had data
    pub path: Option<PathBuf>,
    /// Tickers drawn on the chart, in request order
    pub plotted: Vec<String>,
    /// Tickers skipped for lack of data, in request order
    pub missing: Vec<String>,
    /// Statistics of every plotted ticker
    pub summary: Vec<SeriesStats>,
}

impl ComparisonTool {
    /// Create a new comparison tool
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        renderer: Arc<dyn ChartRenderer>,
        config: Arc<StockConfig>,
    ) -> Self {
        Self {
            provider,
            renderer,
            config,
        }
    }

    async fn compare(&self, params: ComparisonParams) -> Result<ComparisonReport> {
        if params.symbols.is_empty() {
            return Err(StockError::CommandError(
                "at least one symbol is required".to_string(),
            ));
        }

        let period = params
            .period
            .unwrap_or_else(|| self.config.default_period.clone());
        let interval = params
            .interval
            .unwrap_or_else(|| self.config.default_interval.clone());

        let mut fetched: Vec<StockSeries> = Vec::with_capacity(params.symbols.len());
        let mut missing = Vec::new();

        for symbol in params.symbols {
            let request = HistoryRequest::new(symbol.to_uppercase(), period.as_str(), interval.as_str());
            let result = self.provider.history(&request).await.map(|mut series| {
                series.retain_finite();
                series
            });

            match result {
                Ok(series) if !series.is_empty() => fetched.push(series),
                Ok(_) => {
                    tracing::warn!(symbol = %request.symbol, "Provider returned an empty series");
                    missing.push(request.symbol);
                }
                Err(StockError::DataUnavailable { symbol, reason }) => {
                    tracing::warn!(%symbol, %reason, "No data available");
                    missing.push(request.symbol);
                }
                Err(e) => return Err(e),
            }
        }

        if fetched.is_empty() {
            return Ok(ComparisonReport {
                path: None,
                plotted: Vec::new(),
                missing,
                summary: Vec::new(),
            });
        }

        let path = self.renderer.render_comparison(&fetched)?;

        Ok(ComparisonReport {
            path: Some(path),
            plotted: fetched.iter().map(|s| s.symbol.clone()).collect(),
            missing,
            summary: fetched.iter().filter_map(StockSeries::stats).collect(),
        })
    }
}

#[async_trait]
impl Tool for ComparisonTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ComparisonParams = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::InvalidInput(format!("Invalid parameters: {e}"))
        })?;

        let report = self.compare(params).await?;
        serde_json::to_value(report).map_err(|e| agent_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "comparison"
    }

    fn description(&self) -> &'static str {
        "Compare closing prices of several tickers on a single chart. \
         Tickers without data are skipped and reported."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbols": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "Ticker symbols to compare (e.g., ['AAPL', 'MSFT'])"
                },
                "period": {
                    "type": "string",
                    "default": self.config.default_period
                },
                "interval": {
                    "type": "string",
                    "default": self.config.default_interval
                }
            },
            "required": ["symbols"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::chart::MockChartRenderer;
    use crate::series::fixtures::series;

    fn tool(provider: MockMarketDataProvider, renderer: MockChartRenderer) -> ComparisonTool {
        ComparisonTool::new(
            Arc::new(provider),
            Arc::new(renderer),
            Arc::new(StockConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_skips_missing_tickers() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().times(3).returning(|req| {
            if req.symbol == "NOPE" {
                Err(StockError::unavailable(&req.symbol, "not found"))
            } else {
                Ok(series(&req.symbol, &[1.0, 2.0]))
            }
        });

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render_comparison()
            .withf(|all| all.len() == 2 && all[0].symbol == "AAPL" && all[1].symbol == "MSFT")
            .times(1)
            .returning(|_| Ok(PathBuf::from("charts/compare_AAPL_MSFT_1mo_1d.svg")));

        let output = tool(provider, renderer)
            .execute(json!({ "symbols": ["aapl", "nope", "msft"] }))
            .await
            .unwrap();

        let report: ComparisonReport = serde_json::from_value(output).unwrap();
        assert_eq!(report.plotted, vec!["AAPL", "MSFT"]);
        assert_eq!(report.missing, vec!["NOPE"]);
        assert_eq!(report.summary.len(), 2);
        assert!(report.path.is_some());
    }

    #[tokio::test]
    async fn test_nothing_to_plot() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|req| Err(StockError::unavailable(&req.symbol, "not found")));

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render_comparison().never();

        let output = tool(provider, renderer)
            .execute(json!({ "symbols": ["X", "Y"] }))
            .await
            .unwrap();

        let report: ComparisonReport = serde_json::from_value(output).unwrap();
        assert!(report.path.is_none());
        assert!(report.plotted.is_empty());
        assert_eq!(report.missing, vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn test_uses_requested_range() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .withf(|req| req.period == "1y" && req.interval == "1wk")
            .returning(|req| Ok(series(&req.symbol, &[3.0])));

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render_comparison()
            .returning(|_| Ok(PathBuf::from("c.svg")));

        let result = tool(provider, renderer)
            .execute(json!({ "symbols": ["AAPL"], "period": "1y", "interval": "1wk" }))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_non_finite_closes_are_dropped() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().returning(|req| {
            let mut gappy = series(&req.symbol, &[1.0, 2.0, 4.0]);
            gappy.quotes[1].close = f64::NAN;
            Ok(gappy)
        });

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render_comparison()
            .withf(|all| all[0].closes() == vec![1.0, 4.0])
            .returning(|_| Ok(PathBuf::from("c.svg")));

        let output = tool(provider, renderer)
            .execute(json!({ "symbols": ["AAPL"] }))
            .await
            .unwrap();

        let report: ComparisonReport = serde_json::from_value(output).unwrap();
        assert_eq!(report.summary[0].mean, 2.5);
    }

    #[tokio::test]
    async fn test_empty_symbols_rejected() {
        let result = tool(MockMarketDataProvider::new(), MockChartRenderer::new())
            .execute(json!({ "symbols": [] }))
            .await;

        assert!(matches!(result, Err(agent_core::Error::InvalidInput(_))));
    }
}

//! Tool for rendering a price chart

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::chart::ChartRenderer;
use crate::series::StockSeries;

/// Tool that renders one series and reports where the chart was written
pub struct ChartTool {
    renderer: Arc<dyn ChartRenderer>,
}

#[derive(Debug, Deserialize)]
struct ChartParams {
    series: StockSeries,
}

impl ChartTool {
    /// Create a new chart tool
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl Tool for ChartTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ChartParams = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::InvalidInput(format!("Invalid parameters: {e}"))
        })?;

        let path = self.renderer.render(&params.series)?;

        Ok(json!({
            "symbol": params.series.symbol,
            "path": path,
        }))
    }

    fn name(&self) -> &'static str {
        "chart"
    }

    fn description(&self) -> &'static str {
        "Render the closing prices of a price series as a line chart. \
         Returns the path of the written chart."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "series": {
                    "type": "object",
                    "description": "Price series as returned by the stock_data tool"
                }
            },
            "required": ["series"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::MockChartRenderer;
    use crate::error::StockError;
    use crate::series::fixtures::series;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_execute_returns_path() {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .withf(|s| s.symbol == "AAPL")
            .times(1)
            .returning(|_| Ok(PathBuf::from("charts/AAPL_1mo_1d.svg")));

        let tool = ChartTool::new(Arc::new(renderer));
        let output = tool
            .execute(json!({ "series": series("AAPL", &[1.0, 2.0]) }))
            .await
            .unwrap();

        assert_eq!(output["path"], "charts/AAPL_1mo_1d.svg");
        assert_eq!(output["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn test_render_failure_propagates() {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(StockError::ChartError("disk full".to_string())));

        let tool = ChartTool::new(Arc::new(renderer));
        let result = tool
            .execute(json!({ "series": series("AAPL", &[1.0]) }))
            .await;

        match result {
            Err(agent_core::Error::ProcessingFailed(msg)) => assert!(msg.contains("disk full")),
            other => panic!("Expected ProcessingFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_series() {
        let tool = ChartTool::new(Arc::new(MockChartRenderer::new()));
        let result = tool.execute(json!({})).await;
        assert!(matches!(result, Err(agent_core::Error::InvalidInput(_))));
    }
}

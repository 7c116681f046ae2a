//! Tool for closing-price statistics

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::series::StockSeries;

/// Tool computing min/max/mean and change over a series' closing prices
pub struct StatsTool;

#[derive(Debug, Deserialize)]
struct StatsParams {
    series: StockSeries,
}

#[async_trait]
impl Tool for StatsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StatsParams = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::InvalidInput(format!("Invalid parameters: {e}"))
        })?;

        match params.series.stats() {
            Some(stats) => serde_json::to_value(stats)
                .map_err(|e| agent_core::Error::ProcessingFailed(e.to_string())),
            None => Ok(Value::Null),
        }
    }

    fn name(&self) -> &'static str {
        "stats"
    }

    fn description(&self) -> &'static str {
        "Compute basic statistics (min, max, average, change) of a series' closing prices."
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

//! Tools exposing market data, charting and statistics to the agent

pub mod chart;
pub mod comparison;
pub mod stats;
pub mod stock_data;

pub use chart::ChartTool;
pub use comparison::{ComparisonReport, ComparisonTool};
pub use stats::StatsTool;
pub use stock_data::StockDataTool;

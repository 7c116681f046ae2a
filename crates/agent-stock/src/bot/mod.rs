//! Stock agent
//!
//! Dispatches one command line at a time. Market data, charting and
//! statistics are reached through named tools in a [`ToolRegistry`], so any
//! provider or renderer can be swapped in behind them.
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_core::Context;
//! use agent_stock::{StockAgent, StockConfig};
//! use agent_stock::bot::Reply;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let agent = StockAgent::from_config(StockConfig::default())?;
//!     let mut context = Context::new();
//!
//!     if let Reply::Message(text) = agent.dispatch("get AAPL 6mo 1wk", &mut context).await {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;

use crate::api::{MarketDataProvider, YahooFinanceClient};
use crate::chart::{ChartRenderer, SvgChartRenderer};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::SeriesStats;
use crate::tools::{ChartTool, ComparisonReport, ComparisonTool, StatsTool, StockDataTool};
use agent_core::{Agent, Context};
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use comfy_table::{Table, presets::UTF8_FULL};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

pub use commands::{Command, CommandLine};

/// Context key holding the path of the most recent chart
pub const LAST_CHART_KEY: &str = "last_chart";

const EMPTY_COMMAND: &str = "Empty command. Use 'help' to see available commands.";
const UNKNOWN_COMMAND: &str = "Unknown command. Use 'help' to see available commands.";
pub(crate) const GOODBYE: &str = "Goodbye!";

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show this text and keep reading
    Message(String),
    /// Stop reading input
    Exit,
}

#[derive(Debug, Deserialize)]
struct Rendered {
    path: PathBuf,
}

/// Command-driven stock agent
pub struct StockAgent {
    tools: Arc<ToolRegistry>,
    config: Arc<StockConfig>,
}

impl StockAgent {
    /// Create an agent over the given provider and renderer
    pub fn new(
        config: StockConfig,
        provider: Arc<dyn MarketDataProvider>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let config = Arc::new(config);
        let tools = Arc::new(ToolRegistry::new());

        tools.register(Arc::new(StockDataTool::new(
            Arc::clone(&provider),
            Arc::clone(&config),
        )));
        tools.register(Arc::new(ChartTool::new(Arc::clone(&renderer))));
        tools.register(Arc::new(StatsTool));
        tools.register(Arc::new(ComparisonTool::new(
            provider,
            renderer,
            Arc::clone(&config),
        )));

        Self { tools, config }
    }

    /// Create an agent backed by Yahoo Finance and SVG charts
    pub fn from_config(config: StockConfig) -> Result<Self> {
        config.validate()?;
        let provider = Arc::new(YahooFinanceClient::new(&config)?);
        let renderer = Arc::new(SvgChartRenderer::new(&config));
        Ok(Self::new(config, provider, renderer))
    }

    /// Registered tools
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Handle one line of input
    ///
    /// Never fails: problems are turned into messages for the user.
    pub async fn dispatch(&self, input: &str, context: &mut Context) -> Reply {
        let command = match Command::parse(input, &self.config) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::Message(EMPTY_COMMAND.to_string()),
            Err(StockError::UnknownCommand(verb)) => {
                tracing::debug!(%verb, "Unknown command");
                return Reply::Message(UNKNOWN_COMMAND.to_string());
            }
            Err(e) => return Reply::Message(e.to_string()),
        };

        tracing::debug!(command = command.description(), "Dispatching command");

        match self.execute(command, context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Command failed");
                Reply::Message(format!("Error: {e}"))
            }
        }
    }

    /// Execute a parsed command
    pub async fn execute(&self, command: Command, context: &mut Context) -> Result<Reply> {
        let text = match command {
            Command::Get {
                symbol,
                period,
                interval,
            } => self.get(&symbol, &period, &interval, context).await?,
            Command::Stats {
                symbol,
                period,
                interval,
            } => self.stats(&symbol, &period, &interval).await?,
            Command::Compare {
                symbols,
                period,
                interval,
            } => self.compare(&symbols, &period, &interval, context).await?,
            Command::Last => match context.get_typed::<PathBuf>(LAST_CHART_KEY)? {
                Some(path) => format!("Last chart: {}", path.display()),
                None => "No chart has been rendered yet.".to_string(),
            },
            Command::Help => Command::help_text(&self.config),
            Command::Exit => return Ok(Reply::Exit),
        };

        Ok(Reply::Message(text))
    }

    /// Serialized series, or `None` when the provider has nothing
    async fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<Option<Value>> {
        let series = self
            .tools
            .execute(
                "stock_data",
                json!({ "symbol": symbol, "period": period, "interval": interval }),
            )
            .await?;

        Ok((!series.is_null()).then_some(series))
    }

    async fn get(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
        context: &mut Context,
    ) -> Result<String> {
        let Some(series) = self.fetch(symbol, period, interval).await? else {
            return Ok(no_data(symbol));
        };

        let output = self.tools.execute("chart", json!({ "series": series })).await?;
        let rendered: Rendered = serde_json::from_value(output)?;
        context.insert_typed(LAST_CHART_KEY, &rendered.path)?;

        Ok(format!(
            "Saved chart for {symbol} to {}",
            rendered.path.display()
        ))
    }

    async fn stats(&self, symbol: &str, period: &str, interval: &str) -> Result<String> {
        let Some(series) = self.fetch(symbol, period, interval).await? else {
            return Ok(no_data(symbol));
        };

        let output = self.tools.execute("stats", json!({ "series": series })).await?;
        if output.is_null() {
            return Ok(no_data(symbol));
        }

        let stats: SeriesStats = serde_json::from_value(output)?;
        Ok(format_stats(&stats))
    }

    async fn compare(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
        context: &mut Context,
    ) -> Result<String> {
        let output = self
            .tools
            .execute(
                "comparison",
                json!({ "symbols": symbols, "period": period, "interval": interval }),
            )
            .await?;
        let report: ComparisonReport = serde_json::from_value(output)?;

        let mut lines: Vec<String> = report
            .missing
            .iter()
            .map(|symbol| format!("No data found for {symbol}"))
            .collect();

        match &report.path {
            None => lines.push("No valid ticker data to compare.".to_string()),
            Some(path) => {
                context.insert_typed(LAST_CHART_KEY, path)?;
                lines.push(format!(
                    "Saved comparison for: {} to {}",
                    report.plotted.join(", "),
                    path.display()
                ));
                lines.push(summary_table(&report.summary));
            }
        }

        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl Agent for StockAgent {
    async fn process(&self, input: String, context: &mut Context) -> agent_core::Result<String> {
        Ok(match self.dispatch(&input, context).await {
            Reply::Message(text) => text,
            Reply::Exit => GOODBYE.to_string(),
        })
    }

    fn name(&self) -> &str {
        "StockAgent"
    }
}

fn no_data(symbol: &str) -> String {
    format!("No data found for ticker {symbol}.")
}

fn format_change(change_pct: Option<f64>) -> String {
    change_pct.map_or_else(|| "n/a".to_string(), |pct| format!("{pct:+.2}%"))
}

fn format_stats(stats: &SeriesStats) -> String {
    format!(
        "Statistics for {}:\n\
         \x20 - Min: {:.2}\n\
         \x20 - Max: {:.2}\n\
         \x20 - Avg: {:.2}\n\
         \x20 - First: {:.2}\n\
         \x20 - Last: {:.2}\n\
         \x20 - Change: {}\n\
         \x20 - Points: {}",
        stats.symbol,
        stats.min,
        stats.max,
        stats.mean,
        stats.first,
        stats.last,
        format_change(stats.change_pct),
        stats.points,
    )
}

fn summary_table(summary: &[SeriesStats]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Ticker", "Points", "First", "Last", "Min", "Max", "Change",
    ]);

    for stats in summary {
        table.add_row(vec![
            stats.symbol.clone(),
            stats.points.to_string(),
            format!("{:.2}", stats.first),
            format!("{:.2}", stats.last),
            format!("{:.2}", stats.min),
            format!("{:.2}", stats.max),
            format_change(stats.change_pct),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::chart::MockChartRenderer;
    use crate::series::fixtures::series;

    fn agent(provider: MockMarketDataProvider, renderer: MockChartRenderer) -> StockAgent {
        StockAgent::new(
            StockConfig::default(),
            Arc::new(provider),
            Arc::new(renderer),
        )
    }

    fn idle_agent() -> StockAgent {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().never();
        let mut renderer = MockChartRenderer::new();
        renderer.expect_render().never();
        renderer.expect_render_comparison().never();
        agent(provider, renderer)
    }

    fn message(reply: Reply) -> String {
        match reply {
            Reply::Message(text) => text,
            Reply::Exit => panic!("Unexpected exit"),
        }
    }

    #[test]
    fn test_registers_tools() {
        let agent = idle_agent();
        assert_eq!(
            agent.tools().names(),
            vec!["chart", "comparison", "stats", "stock_data"]
        );
    }

    #[tokio::test]
    async fn test_get_fetches_exact_arguments_and_renders() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .withf(|req| req.symbol == "AAPL" && req.period == "6mo" && req.interval == "1wk")
            .times(1)
            .returning(|_| Ok(series("AAPL", &[1.0, 2.0, 3.0])));

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .withf(|s| s.symbol == "AAPL" && s.len() == 3)
            .times(1)
            .returning(|_| Ok(PathBuf::from("charts/AAPL_6mo_1wk.svg")));

        let agent = agent(provider, renderer);
        let mut context = Context::new();

        let text = message(agent.dispatch("get AAPL 6mo 1wk", &mut context).await);
        assert_eq!(text, "Saved chart for AAPL to charts/AAPL_6mo_1wk.svg");

        let last: PathBuf = context.get_typed(LAST_CHART_KEY).unwrap().unwrap();
        assert_eq!(last, PathBuf::from("charts/AAPL_6mo_1wk.svg"));
    }

    #[tokio::test]
    async fn test_empty_line_invokes_nothing() {
        let agent = idle_agent();
        let mut context = Context::new();

        let text = message(agent.dispatch("   ", &mut context).await);
        assert_eq!(text, EMPTY_COMMAND);
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_verb() {
        let agent = idle_agent();
        let mut context = Context::new();

        let text = message(agent.dispatch("foo AAPL", &mut context).await);
        assert_eq!(text, UNKNOWN_COMMAND);
    }

    #[tokio::test]
    async fn test_malformed_arguments_reported() {
        let agent = idle_agent();
        let mut context = Context::new();

        let text = message(agent.dispatch("get", &mut context).await);
        assert_eq!(text, "Invalid command. Use: get [TICKER] [PERIOD] [INTERVAL]");

        let text = message(agent.dispatch("get AAPL 7mo", &mut context).await);
        assert!(text.starts_with("Invalid period '7mo'"));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_renderer() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .times(1)
            .returning(|req| Err(StockError::unavailable(&req.symbol, "unreachable")));

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render().never();

        let agent = agent(provider, renderer);
        let mut context = Context::new();

        let text = message(agent.dispatch("get aapl", &mut context).await);
        assert_eq!(text, "No data found for ticker AAPL.");
        assert!(!context.contains_key(LAST_CHART_KEY));
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|_| Ok(series("AAPL", &[1.0])));

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(StockError::ChartError("permission denied".to_string())));

        let agent = agent(provider, renderer);
        let text = message(agent.dispatch("get AAPL", &mut Context::new()).await);

        assert!(text.starts_with("Error: "));
        assert!(text.contains("permission denied"));
    }

    #[tokio::test]
    async fn test_stats() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .withf(|req| req.symbol == "MSFT" && req.period == "1mo" && req.interval == "1d")
            .returning(|_| Ok(series("MSFT", &[10.0, 30.0, 20.0])));

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render().never();

        let agent = agent(provider, renderer);
        let text = message(agent.dispatch("stats msft", &mut Context::new()).await);

        assert!(text.starts_with("Statistics for MSFT:\n"));
        assert!(text.contains("  - Min: 10.00"));
        assert!(text.contains("  - Max: 30.00"));
        assert!(text.contains("  - Avg: 20.00"));
        assert!(text.contains("  - Change: +100.00%"));
    }

    #[tokio::test]
    async fn test_non_finite_bar_does_not_break_get_or_stats() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().times(2).returning(|req| {
            let mut gappy = series(&req.symbol, &[1.0, 2.0, 3.0]);
            gappy.quotes[1].close = f64::NAN;
            Ok(gappy)
        });

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .withf(|s| s.closes() == vec![1.0, 3.0])
            .times(1)
            .returning(|_| Ok(PathBuf::from("charts/AAPL_1mo_1d.svg")));

        let agent = agent(provider, renderer);
        let mut context = Context::new();

        let text = message(agent.dispatch("get AAPL", &mut context).await);
        assert_eq!(text, "Saved chart for AAPL to charts/AAPL_1mo_1d.svg");

        let text = message(agent.dispatch("stats AAPL", &mut context).await);
        assert!(text.starts_with("Statistics for AAPL:\n"));
        assert!(text.contains("  - Avg: 2.00"));
    }

    #[tokio::test]
    async fn test_stats_no_data() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|req| Err(StockError::unavailable(&req.symbol, "not found")));

        let agent = agent(provider, MockChartRenderer::new());
        let text = message(agent.dispatch("stats ZZZZ", &mut Context::new()).await);
        assert_eq!(text, "No data found for ticker ZZZZ.");
    }

    #[tokio::test]
    async fn test_compare_reports_missing() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().times(2).returning(|req| {
            if req.symbol == "AAPL" {
                Ok(series("AAPL", &[1.0, 2.0]))
            } else {
                Err(StockError::unavailable(&req.symbol, "not found"))
            }
        });

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render_comparison()
            .times(1)
            .returning(|_| Ok(PathBuf::from("charts/compare_AAPL_1mo_1d.svg")));

        let agent = agent(provider, renderer);
        let mut context = Context::new();
        let text = message(agent.dispatch("compare aapl nope", &mut context).await);

        assert!(text.starts_with("No data found for NOPE\n"));
        assert!(text.contains("Saved comparison for: AAPL to charts/compare_AAPL_1mo_1d.svg"));
        assert!(text.contains("Ticker"));
        assert!(context.contains_key(LAST_CHART_KEY));
    }

    #[tokio::test]
    async fn test_compare_nothing_valid() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|req| Err(StockError::unavailable(&req.symbol, "not found")));

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render_comparison().never();

        let agent = agent(provider, renderer);
        let text = message(agent.dispatch("compare X", &mut Context::new()).await);
        assert_eq!(text, "No data found for X\nNo valid ticker data to compare.");
    }

    #[tokio::test]
    async fn test_last_chart() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|_| Ok(series("AAPL", &[1.0])));

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Ok(PathBuf::from("charts/AAPL_1mo_1d.svg")));

        let agent = agent(provider, renderer);
        let mut context = Context::new();

        let text = message(agent.dispatch("last", &mut context).await);
        assert_eq!(text, "No chart has been rendered yet.");

        agent.dispatch("get AAPL", &mut context).await;
        let text = message(agent.dispatch("last", &mut context).await);
        assert_eq!(text, "Last chart: charts/AAPL_1mo_1d.svg");
    }

    #[tokio::test]
    async fn test_help_and_exit() {
        let agent = idle_agent();
        let mut context = Context::new();

        let text = message(agent.dispatch("HELP", &mut context).await);
        assert!(text.starts_with("Available commands:"));

        assert_eq!(agent.dispatch("exit", &mut context).await, Reply::Exit);
    }

    #[tokio::test]
    async fn test_agent_trait_process() {
        let agent = idle_agent();
        let mut context = Context::new();

        assert_eq!(agent.name(), "StockAgent");
        let text = agent.process("exit".to_string(), &mut context).await.unwrap();
        assert_eq!(text, GOODBYE);

        let text = agent.process("nope".to_string(), &mut context).await.unwrap();
        assert_eq!(text, UNKNOWN_COMMAND);
    }
}

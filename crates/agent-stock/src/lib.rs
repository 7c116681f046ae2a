//! Command-driven stock data agent
//!
//! Fetches historical prices for tickers and renders them as charts. It
//! includes:
//!
//! - Price history from Yahoo Finance (`get`, `stats`, `compare`)
//! - SVG line charts, with an optional moving-average overlay
//! - Closing-price statistics
//! - An interactive loop that runs one command at a time
//!
//! # Architecture
//!
//! `StockAgent` parses each line into a [`bot::Command`] and runs it against
//! named tools in an `agent_tools::ToolRegistry`:
//! - `stock_data`: fetches a series through a [`api::MarketDataProvider`]
//! - `chart`: renders a series through a [`chart::ChartRenderer`]
//! - `stats`: summarises closing prices
//! - `comparison`: fetches several tickers and plots them together
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_core::Context;
//! use agent_stock::{StockAgent, StockConfig, repl};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let agent = StockAgent::from_config(StockConfig::default())?;
//!     let stdin = std::io::stdin();
//!     repl::run_repl(&agent, stdin.lock(), std::io::stdout(), &mut Context::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod chart;
pub mod config;
pub mod error;
pub mod repl;
pub mod series;
pub mod tools;

// Re-export main types for convenience
pub use bot::{Reply, StockAgent};
pub use config::StockConfig;
pub use error::{Result, StockError};
pub use series::{HistoryRequest, Quote, SeriesStats, StockSeries};

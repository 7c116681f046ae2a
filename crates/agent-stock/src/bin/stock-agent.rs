//! Stock Agent CLI
//!
//! An interactive command-line interface for fetching and charting stock data.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! cargo run --bin stock-agent -p agent-stock
//!
//! # One command, then exit
//! cargo run --bin stock-agent -p agent-stock -- --command "get AAPL 6mo 1wk"
//!
//! # Charts somewhere else, JSON logs
//! STOCK_AGENT_CHART_DIR=/tmp/charts cargo run --bin stock-agent -p agent-stock -- --json-logs
//! ```

use agent_core::{Agent, Context};
use agent_stock::{StockAgent, StockConfig, repl};
use agent_utils::LoggingConfig;
use clap::Parser;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stock-agent")]
#[command(about = "Fetch stock price history and render charts", long_about = None)]
struct Args {
    /// Run a single command (e.g. "get AAPL 6mo 1wk") and exit
    #[arg(short, long)]
    command: Option<String>,

    /// Default period for commands that omit it
    #[arg(long)]
    period: Option<String>,

    /// Default interval for commands that omit it
    #[arg(long)]
    interval: Option<String>,

    /// Directory charts are written to
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn build_config(args: &Args) -> agent_stock::Result<StockConfig> {
    let mut builder = StockConfig::builder().with_env();

    if let Some(period) = &args.period {
        builder = builder.default_period(period.as_str());
    }
    if let Some(interval) = &args.interval {
        builder = builder.default_interval(interval.as_str());
    }
    if let Some(dir) = &args.chart_dir {
        builder = builder.chart_dir(dir.as_path());
    }

    builder.build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default().with_env_format();
    if args.json_logs {
        logging = logging.json();
    }
    agent_utils::init_tracing(&logging);

    let config = build_config(&args)?;
    tracing::info!(
        chart_dir = %config.chart_dir.display(),
        period = %config.default_period,
        interval = %config.default_interval,
        "Starting stock-agent"
    );

    let agent = StockAgent::from_config(config)?;
    let mut context = Context::new();

    if let Some(command) = args.command {
        let reply = agent.process(command, &mut context).await?;
        println!("{reply}");
        return Ok(());
    }

    let stdin = io::stdin();
    repl::run_repl(&agent, stdin.lock(), io::stdout(), &mut context).await?;

    Ok(())
}

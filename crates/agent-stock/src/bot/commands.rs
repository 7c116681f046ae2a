//! Command parsing for the stock agent
//!
//! A line is split on whitespace into a verb and positional arguments
//! ([`CommandLine`]), then checked against the known verbs ([`Command`]).

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::{INTERVALS, PERIODS, is_valid_interval, is_valid_period};

/// A verb with its positional arguments, exactly as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// First token, lower-cased; never empty
    pub verb: String,
    /// Remaining tokens in order
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split a raw input line; `None` for a blank line
    pub fn parse(input: &str) -> Option<Self> {
        let mut tokens = input.split_whitespace();
        let verb = tokens.next()?.to_lowercase();
        Some(Self {
            verb,
            args: tokens.map(str::to_string).collect(),
        })
    }
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a ticker and chart its closing prices
    Get {
        symbol: String,
        period: String,
        interval: String,
    },
    /// Fetch a ticker and summarise its closing prices
    Stats {
        symbol: String,
        period: String,
        interval: String,
    },
    /// Chart several tickers together
    Compare {
        symbols: Vec<String>,
        period: String,
        interval: String,
    },
    /// Show the most recently rendered chart
    Last,
    /// Show help
    Help,
    /// Exit the agent
    Exit,
}

impl Command {
    /// Turn a command line into a command, filling defaults from `config`
    pub fn from_line(line: &CommandLine, config: &StockConfig) -> Result<Self> {
        let args = &line.args;

        match line.verb.as_str() {
            "get" => {
                let (symbol, period, interval) = ticker_args(args, config, "get")?;
                Ok(Command::Get {
                    symbol,
                    period,
                    interval,
                })
            }
            "stats" => {
                let (symbol, period, interval) = ticker_args(args, config, "stats")?;
                Ok(Command::Stats {
                    symbol,
                    period,
                    interval,
                })
            }
            "compare" => {
                if args.is_empty() {
                    return Err(StockError::CommandError(
                        "Invalid command. Use: compare [TICKER1] [TICKER2] ...".to_string(),
                    ));
                }
                Ok(Command::Compare {
                    symbols: args.iter().map(|s| s.to_uppercase()).collect(),
                    period: config.default_period.clone(),
                    interval: config.default_interval.clone(),
                })
            }
            "last" => Ok(Command::Last),
            "help" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(StockError::UnknownCommand(other.to_string())),
        }
    }

    /// Parse a raw line; `Ok(None)` for a blank line
    pub fn parse(input: &str, config: &StockConfig) -> Result<Option<Self>> {
        CommandLine::parse(input)
            .map(|line| Self::from_line(&line, config))
            .transpose()
    }

    /// Help text for all commands
    pub fn help_text(config: &StockConfig) -> String {
        let period = &config.default_period;
        let interval = &config.default_interval;
        format!(
            "Available commands:\n\
             \x20 get [TICKER] [PERIOD] [INTERVAL]   - Fetch and plot stock data. (Defaults: PERIOD={period}, INTERVAL={interval})\n\
             \x20 stats [TICKER] [PERIOD] [INTERVAL] - Show basic statistics for the stock. (Defaults: PERIOD={period}, INTERVAL={interval})\n\
             \x20 compare [TICKER1] [TICKER2] ...    - Compare multiple stocks on a single chart. (Defaults: PERIOD={period}, INTERVAL={interval})\n\
             \x20 last                               - Show where the last chart was saved.\n\
             \x20 exit                               - Quit the application.\n\
             \x20 help                               - Show this help message.\n\
             \n\
             Periods:   {}\n\
             Intervals: {}",
            PERIODS.join(" "),
            INTERVALS.join(" "),
        )
    }

    /// Short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Get { .. } => "Fetch and plot stock data",
            Command::Stats { .. } => "Basic statistics",
            Command::Compare { .. } => "Stock comparison",
            Command::Last => "Show last chart",
            Command::Help => "Show help",
            Command::Exit => "Exit",
        }
    }
}

/// `[TICKER] [PERIOD] [INTERVAL]`, extra tokens ignored
fn ticker_args(
    args: &[String],
    config: &StockConfig,
    verb: &str,
) -> Result<(String, String, String)> {
    let symbol = args.first().ok_or_else(|| {
        StockError::CommandError(format!(
            "Invalid command. Use: {verb} [TICKER] [PERIOD] [INTERVAL]"
        ))
    })?;

    let period = args.get(1).unwrap_or(&config.default_period);
    if !is_valid_period(period) {
        return Err(StockError::CommandError(format!(
            "Invalid period '{period}'. Use one of: {}",
            PERIODS.join(", ")
        )));
    }

    let interval = args.get(2).unwrap_or(&config.default_interval);
    if !is_valid_interval(interval) {
        return Err(StockError::CommandError(format!(
            "Invalid interval '{interval}'. Use one of: {}",
            INTERVALS.join(", ")
        )));
    }

    Ok((symbol.to_uppercase(), period.clone(), interval.clone()))
}

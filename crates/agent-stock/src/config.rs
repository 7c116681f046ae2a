//! Configuration for the stock agent

use crate::error::{Result, StockError};
use crate::series::{is_valid_interval, is_valid_period};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for fetching and charting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Period used when a command omits it
    pub default_period: String,

    /// Interval used when a command omits it
    pub default_interval: String,

    /// Upper bound for a single market-data request
    pub request_timeout: Duration,

    /// Market-data requests allowed per minute
    pub requests_per_minute: u32,

    /// Directory charts are written to
    pub chart_dir: PathBuf,

    /// Chart width in pixels
    pub chart_width: u32,

    /// Chart height in pixels
    pub chart_height: u32,

    /// Window of the moving-average overlay on single-ticker charts
    pub sma_window: Option<usize>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            default_period: "1mo".to_string(),
            default_interval: "1d".to_string(),
            request_timeout: Duration::from_secs(30),
            requests_per_minute: 60,
            chart_dir: PathBuf::from("charts"),
            chart_width: 1000,
            chart_height: 500,
            sma_window: Some(20),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !is_valid_period(&self.default_period) {
            return Err(StockError::ConfigError(format!(
                "unknown default period '{}'",
                self.default_period
            )));
        }

        if !is_valid_interval(&self.default_interval) {
            return Err(StockError::ConfigError(format!(
                "unknown default interval '{}'",
                self.default_interval
            )));
        }

        if self.requests_per_minute == 0 {
            return Err(StockError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(StockError::ConfigError(
                "chart dimensions must be greater than 0".to_string(),
            ));
        }

        if self.sma_window == Some(0) {
            return Err(StockError::ConfigError(
                "sma_window must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    default_period: Option<String>,
    default_interval: Option<String>,
    request_timeout: Option<Duration>,
    requests_per_minute: Option<u32>,
    chart_dir: Option<PathBuf>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
    sma_window: Option<Option<usize>>,
}

impl StockConfigBuilder {
    /// Set the default period
    pub fn default_period(mut self, period: impl Into<String>) -> Self {
        self.default_period = Some(period.into());
        self
    }

    /// Set the default interval
    pub fn default_interval(mut self, interval: impl Into<String>) -> Self {
        self.default_interval = Some(interval.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the request rate limit
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Set the chart output directory
    pub fn chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(dir.into());
        self
    }

    /// Set chart dimensions
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Set the moving-average window, `None` disables the overlay
    pub fn sma_window(mut self, window: Option<usize>) -> Self {
        self.sma_window = Some(window);
        self
    }

    /// Load overrides from `STOCK_AGENT_*` environment variables
    pub fn with_env(mut self) -> Self {
        if let Ok(period) = std::env::var("STOCK_AGENT_PERIOD") {
            self.default_period = Some(period);
        }
        if let Ok(interval) = std::env::var("STOCK_AGENT_INTERVAL") {
            self.default_interval = Some(interval);
        }
        if let Ok(dir) = std::env::var("STOCK_AGENT_CHART_DIR") {
            self.chart_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            default_period: self.default_period.unwrap_or(defaults.default_period),
            default_interval: self.default_interval.unwrap_or(defaults.default_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            requests_per_minute: self
                .requests_per_minute
                .unwrap_or(defaults.requests_per_minute),
            chart_dir: self.chart_dir.unwrap_or(defaults.chart_dir),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
            sma_window: self.sma_window.unwrap_or(defaults.sma_window),
        };

        config.validate()?;
        Ok(config)
    }
}

//! Shared utilities for the stock agent workspace
//!
//! Logging setup and the configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{LogFormat, LoggingConfig};
pub use logging::init_tracing;

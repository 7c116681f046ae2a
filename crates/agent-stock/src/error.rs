//! Error types for stock agent operations

use thiserror::Error;

/// Stock agent specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Malformed command arguments; the message is shown to the user as is
    #[error("{0}")]
    CommandError(String),

    /// The verb of a command line is not recognised
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Chart rendering failed
    #[error("Chart error: {0}")]
    ChartError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Shorthand for [`StockError::DataUnavailable`]
    pub fn unavailable(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Convert StockError to agent_core::Error
impl From<StockError> for agent_core::Error {
    fn from(err: StockError) -> Self {
        match err {
            StockError::CommandError(msg) => agent_core::Error::InvalidInput(msg),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

/// Convert agent_core::Error to StockError
impl From<agent_core::Error> for StockError {
    fn from(err: agent_core::Error) -> Self {
        StockError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::UnknownCommand("foo".to_string());
        assert_eq!(err.to_string(), "Unknown command: foo");

        let err = StockError::unavailable("AAPL", "No data found");
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");

        let err = StockError::CommandError("Invalid command. Use: get [TICKER]".to_string());
        assert_eq!(err.to_string(), "Invalid command. Use: get [TICKER]");
    }

    #[test]
    fn test_error_conversion() {
        let stock_err = StockError::ChartError("disk full".to_string());
        let agent_err: agent_core::Error = stock_err.into();

        match agent_err {
            agent_core::Error::ProcessingFailed(msg) => {
                assert!(msg.contains("Chart error"));
            }
            _ => panic!("Expected ProcessingFailed variant"),
        }

        let agent_err: agent_core::Error = StockError::CommandError("bad".to_string()).into();
        assert!(matches!(agent_err, agent_core::Error::InvalidInput(_)));
    }
}

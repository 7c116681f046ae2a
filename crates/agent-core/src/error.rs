//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent and tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input handed to an agent or tool
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A named tool is not registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Agent or tool processing failed
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

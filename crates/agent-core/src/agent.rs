//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process one line of input and return the reply text
    ///
    /// The context carries session state between calls, so callers that
    /// want follow-up commands to see earlier results must reuse it.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

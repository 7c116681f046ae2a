//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agents can execute
///
/// Each tool provides a name, a description, and a JSON schema for its input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value. `Value::Null` is a valid result for tools
    /// that may legitimately find nothing.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "symbol": { "type": "string" },
    ///         "period": { "type": "string", "default": "1mo" }
    ///     },
    ///     "required": ["symbol"]
    /// });
    /// assert_eq!(schema["required"][0], "symbol");
    /// ```
    fn input_schema(&self) -> Value;
}

//! Tool management and execution framework
//!
//! Tools are named capabilities with a JSON input contract. The stock agent
//! registers its fetcher, renderer and statistics tools here and looks them
//! up by name when dispatching commands.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;

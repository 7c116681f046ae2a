//! Core abstractions shared by the stock agent workspace
//!
//! Defines the [`Agent`] trait, the per-session [`Context`] and the common
//! error type used at tool and agent boundaries.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};

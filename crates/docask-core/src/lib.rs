//! # DocAsk Core
//!
//! Shared configuration and error types for the DocAsk workspace.

pub mod config;
pub mod error;

pub use config::DocaskConfig;
pub use error::{DocaskError, Result};

//! Shared utilities for prompt-studio
//!
//! This crate provides common functionality used across the prompt-studio workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EnvSource};
pub use logging::{init_tracing, init_tracing_with};

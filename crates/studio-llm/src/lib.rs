//! Completion service abstraction for prompt-studio
//!
//! This crate provides provider-agnostic types for sending a rendered prompt
//! to a language model and reading the reply back. It includes:
//!
//! - Text message types
//! - Completion request/response types
//! - The [`CompletionProvider`] trait
//! - An OpenAI-compatible HTTP provider

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionRequestBuilder, CompletionResponse, StopReason, TokenUsage};
pub use error::{CompletionError, Result};
pub use messages::{Message, Role};
pub use provider::CompletionProvider;

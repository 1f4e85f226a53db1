//! prompt-studio HTTP server library
//!
//! Exposes configuration, state, error handling and routes so the binary and
//! the integration tests build the same application.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use router::build_app_router;
pub use state::AppState;

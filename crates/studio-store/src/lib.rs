//! Persistence collaborator for prompt-studio
//!
//! The service layer talks to storage only through the [`Persistence`] trait:
//! `select` (with equality filters, ordering and a limit), `insert`, `update`
//! and `delete` over JSON rows. Two backends implement it:
//!
//! - [`MemoryBackend`]: in-process tables, seeded with development data
//! - [`RestBackend`]: a hosted PostgREST-style API
//!
//! [`StoreConfig`] picks one at startup.

mod config;
mod error;
mod memory;
mod persistence;
mod query;
mod rest;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use persistence::{BackendMode, Persistence, Row, from_row, from_rows, row_id, tables, to_row};
pub use query::{Order, Query};
pub use rest::{RestBackend, RestConfig};

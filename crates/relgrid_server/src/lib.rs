//! RELGRID Server
//!
//! HTTP binding for one editing session: UI events go in as JSON, per-table
//! updates come back as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod error;

pub use api::{AppState, CellEdit, router};
pub use config::{InputError, ServerConfig};
pub use error::ApiError;

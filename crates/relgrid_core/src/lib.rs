//! RELGRID Core Types
//!
//! This crate contains pure types with no I/O: identifiers for tables and
//! rows, the value stored in a grid cell, and the error type shared by
//! every other crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod value;

// Re-exports
pub use error::{ErrorKind, GridError, GridResult};
pub use id::{RowId, TableId};
pub use value::CellValue;

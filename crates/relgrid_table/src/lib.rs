//! RELGRID Tables
//!
//! In-memory relational tables linked parent-to-child by foreign keys,
//! the registry that owns them for one editing session, and the adapters
//! that build a registry from input files or nested records.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod filter;
pub mod flatten;
pub mod input;
pub mod registry;
pub mod row;
pub mod table;

pub use column::{ColumnDescriptor, ColumnKind, ColumnRef, GridColumn};
pub use filter::ActiveFilter;
pub use flatten::{flatten, FlattenSchema, TableSpec};
pub use input::{EditorInput, ParentInput, TableInput};
pub use registry::TableRegistry;
pub use row::{GridRecord, Row};
pub use table::{ChildLink, InsertedRow, ParentLink, RelationalTable};

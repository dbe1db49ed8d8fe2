//! Core error types for RELGRID.

use crate::id::TableId;
use serde::Serialize;

/// Core result type
pub type GridResult<T> = Result<T, GridError>;

/// Broad category of a [`GridError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed link or column reference
    Schema,
    /// Unknown table or row
    NotFound,
    /// Missing parent/child link
    Link,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema => write!(f, "schema_error"),
            Self::NotFound => write!(f, "not_found"),
            Self::Link => write!(f, "link_error"),
        }
    }
}

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A link or column reference does not fit the table schema
    #[error("Schema error: {reason}")]
    Schema {
        /// What was wrong
        reason: String,
    },

    /// A table or row id is unknown
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity ("table", "row", ...)
        kind: String,
        /// The id that was looked up
        id: String,
    },

    /// The child table has no parent link back to the given parent
    #[error("No link from table {parent} to child table {child}")]
    Link {
        /// Parent table id
        parent: TableId,
        /// Child table id
        child: TableId,
    },
}

impl GridError {
    /// Create a schema error
    #[must_use]
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Create a not-found error for a table
    #[must_use]
    pub fn table_not_found(id: &TableId) -> Self {
        Self::NotFound {
            kind: "Table".to_string(),
            id: id.to_string(),
        }
    }

    /// Create a not-found error for a row of a table
    #[must_use]
    pub fn row_not_found(table: &TableId, row: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind: format!("Row of table {}", table),
            id: row.to_string(),
        }
    }

    /// Get the broad category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Link { .. } => ErrorKind::Link,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::schema(format!("malformed input: {}", err))
    }
}

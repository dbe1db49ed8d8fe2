//! Active row filters.

use crate::column::foreign_key_column_id;
use crate::row::Row;
use relgrid_core::RowId;
use serde::{Deserialize, Serialize};

/// Equality constraint `column == parent_row_id` on a foreign-key column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveFilter {
    /// Foreign-key column name (without the grid prefix)
    pub column: String,
    /// Id of the parent row the shown rows must reference
    pub parent_row_id: RowId,
}

impl ActiveFilter {
    /// Create a new filter
    #[must_use]
    pub fn new(column: impl Into<String>, parent_row_id: RowId) -> Self {
        Self {
            column: column.into(),
            parent_row_id,
        }
    }

    /// Filter expression understood by the grid renderer, e.g. `{!fk_user_id}=3`
    #[must_use]
    pub fn predicate(&self) -> String {
        format!(
            "{{{}}}={}",
            foreign_key_column_id(&self.column),
            self.parent_row_id
        )
    }

    /// Check if a row passes this filter
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column).and_then(|v| v.as_row_id()) == Some(self.parent_row_id)
    }
}

impl std::fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} == {}", self.column, self.parent_row_id)
    }
}

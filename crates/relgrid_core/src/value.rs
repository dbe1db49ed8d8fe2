//! Cell values.

use crate::id::RowId;
use serde::{Deserialize, Serialize};

/// Value held by a single grid cell
///
/// Identifier and foreign-key cells hold integers; everything else the grid
/// edits is text. An empty cell is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Non-negative integer (row ids and foreign keys)
    Integer(u64),
    /// Free text
    Text(String),
}

impl CellValue {
    /// The empty cell
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Check if the cell is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Interpret the cell as a row id
    #[must_use]
    pub fn as_row_id(&self) -> Option<RowId> {
        match self {
            Self::Integer(n) => Some(RowId::from_raw(*n)),
            Self::Text(_) => None,
        }
    }

    /// Convert a JSON scalar into a cell value
    ///
    /// Non-negative integers stay integers; `null` becomes the empty cell and
    /// any other value is stored as its textual form.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::empty(),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(n) => Self::Integer(n),
                None => Self::Text(n.to_string()),
            },
            other => Self::Text(other.to_string()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<RowId> for CellValue {
    fn from(id: RowId) -> Self {
        Self::Integer(id.as_u64())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

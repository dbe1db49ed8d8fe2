//! Row records.

use crate::column::{CHILD_LINK_PREFIX, ID_COLUMN};
use indexmap::IndexMap;
use relgrid_core::{CellValue, RowId};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A row projected into the grid column-id namespace
pub type GridRecord = IndexMap<String, CellValue>;

/// One row of a relational table
///
/// Values are keyed by column name. The `id` value always mirrors the row's
/// primary key. Child-link cells are keyed by their `!child_<table>` column id
/// since those columns have no name of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    values: IndexMap<String, CellValue>,
}

impl Row {
    /// Create a row holding only its id
    #[must_use]
    pub fn new(id: RowId) -> Self {
        let mut values = IndexMap::new();
        values.insert(ID_COLUMN.to_string(), CellValue::from(id));
        Self { id, values }
    }

    /// Primary key
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Get the value of a column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// All values, in column order
    #[must_use]
    pub fn values(&self) -> &IndexMap<String, CellValue> {
        &self.values
    }

    pub(crate) fn set(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        if column != ID_COLUMN {
            self.values.insert(column, value);
        }
    }
}

/// Serializes the column values only; child-link placeholders belong to the
/// grid projection.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = self
            .values
            .iter()
            .filter(|(column, _)| !column.starts_with(CHILD_LINK_PREFIX));
        let mut map = serializer.serialize_map(None)?;
        for (column, value) in data {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

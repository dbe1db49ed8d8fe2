//! Relational tables.

use crate::column::{
    child_link_column_id, validate_column_name, ColumnDescriptor, ColumnKind, GridColumn,
    ADDED_LINK_PLACEHOLDER, ID_COLUMN, LINK_PLACEHOLDER,
};
use crate::filter::ActiveFilter;
use crate::row::{GridRecord, Row};
use indexmap::IndexMap;
use relgrid_core::{CellValue, GridError, GridResult, RowId, TableId};
use serde::{Deserialize, Serialize};

/// Link from a child table to one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Column of the child holding the parent row id
    pub foreign_key_column: String,
}

/// Link from a parent table to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    /// Display name of the child, used as the link column label
    pub display_name: String,
}

/// Result of inserting a row through the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedRow {
    /// The appended row
    pub row: Row,
    /// Foreign-key columns left empty because no filter bound them
    pub unbound_foreign_keys: Vec<String>,
}

/// A table's schema, rows, and parent/child links
///
/// Related tables are referenced by id only; the registry owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalTable {
    id: TableId,
    display_name: String,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
    parent_links: IndexMap<TableId, ParentLink>,
    child_links: IndexMap<TableId, ChildLink>,
    /// Highest row id ever assigned, so deleted ids are not handed out again
    high_water: Option<RowId>,
}

impl RelationalTable {
    /// Create an empty table
    ///
    /// The `id` column is always present and comes first; listing it in
    /// `columns` is allowed and has no further effect.
    ///
    /// # Errors
    ///
    /// Returns a schema error for invalid or duplicate column names
    pub fn new<I, S>(
        id: impl Into<TableId>,
        display_name: impl Into<String>,
        columns: I,
    ) -> GridResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self {
            id: id.into(),
            display_name: display_name.into(),
            columns: vec![ColumnDescriptor::identifier()],
            rows: Vec::new(),
            parent_links: IndexMap::new(),
            child_links: IndexMap::new(),
            high_water: None,
        };
        for name in columns {
            let name = name.into();
            if name != ID_COLUMN {
                table.add_column(name)?;
            }
        }
        Ok(table)
    }

    /// Table id
    #[must_use]
    pub fn id(&self) -> &TableId {
        &self.id
    }

    /// Human-readable label
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Data columns in order (identifier, plain, and foreign-key columns)
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Get a data column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All rows in insertion order
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by id
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Rows passing the given filter (all rows when there is none)
    #[must_use]
    pub fn filtered_rows(&self, filter: Option<&ActiveFilter>) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(r)))
            .collect()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parent tables, keyed by parent id
    #[must_use]
    pub fn parent_links(&self) -> &IndexMap<TableId, ParentLink> {
        &self.parent_links
    }

    /// Child tables, keyed by child id
    #[must_use]
    pub fn child_links(&self) -> &IndexMap<TableId, ChildLink> {
        &self.child_links
    }

    /// Append a plain column; existing rows get an empty cell
    ///
    /// # Errors
    ///
    /// Returns a schema error for invalid or duplicate column names
    pub fn add_column(&mut self, name: impl Into<String>) -> GridResult<()> {
        let name = name.into();
        validate_column_name(&name)?;
        if self.column(&name).is_some() {
            return Err(GridError::schema(format!(
                "column {} already exists in table {}",
                name, self.id
            )));
        }
        for row in &mut self.rows {
            row.set(name.clone(), CellValue::empty());
        }
        self.columns.push(ColumnDescriptor::plain(name));
        Ok(())
    }

    /// Add a plain column unless a column of that name exists
    ///
    /// # Errors
    ///
    /// Returns a schema error for invalid column names
    pub fn ensure_column(&mut self, name: &str) -> GridResult<()> {
        if self.column(name).is_some() {
            return Ok(());
        }
        self.add_column(name)
    }

    /// Link `child` below this table through its `foreign_key_column`
    ///
    /// # Errors
    ///
    /// Returns a schema error if the column is not a plain column of `child`
    /// or if the link already exists
    pub fn add_child_table(
        &mut self,
        child: &mut RelationalTable,
        foreign_key_column: &str,
    ) -> GridResult<()> {
        self.check_child_link(child, foreign_key_column)?;
        self.attach_child(child.id.clone(), child.display_name.clone());
        child.attach_parent(self.id.clone(), foreign_key_column);
        Ok(())
    }

    pub(crate) fn check_child_link(
        &self,
        child: &RelationalTable,
        foreign_key_column: &str,
    ) -> GridResult<()> {
        if child.id == self.id {
            return Err(GridError::schema(format!(
                "table {} cannot be its own child",
                self.id
            )));
        }
        if self.child_links.contains_key(&child.id) || child.parent_links.contains_key(&self.id) {
            return Err(GridError::schema(format!(
                "link from {} to {} already exists",
                self.id, child.id
            )));
        }
        match child.column(foreign_key_column).map(|c| &c.kind) {
            Some(ColumnKind::Plain) => Ok(()),
            Some(_) => Err(GridError::schema(format!(
                "column {} of table {} cannot serve as a foreign key",
                foreign_key_column, child.id
            ))),
            None => Err(GridError::schema(format!(
                "foreign key column {} is not a column of table {}",
                foreign_key_column, child.id
            ))),
        }
    }

    pub(crate) fn attach_child(&mut self, child: TableId, display_name: String) {
        let column_id = child_link_column_id(&child);
        for row in &mut self.rows {
            row.set(column_id.clone(), CellValue::from(LINK_PLACEHOLDER));
        }
        self.child_links.insert(child, ChildLink { display_name });
    }

    pub(crate) fn attach_parent(&mut self, parent: TableId, foreign_key_column: &str) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == foreign_key_column) {
            *column = ColumnDescriptor::foreign_key(foreign_key_column);
        }
        self.parent_links.insert(
            parent,
            ParentLink {
                foreign_key_column: foreign_key_column.to_string(),
            },
        );
    }

    /// Columns shown by the grid
    ///
    /// Foreign-key columns are hidden (their values stay in the row data) and
    /// one read-only link column is appended per child table.
    #[must_use]
    pub fn visible_columns(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| !c.is_foreign_key())
            .cloned()
            .chain(self.child_links.iter().map(|(child, link)| {
                ColumnDescriptor::child_link(child.clone(), link.display_name.clone())
            }))
            .collect()
    }

    /// Visible columns in the grid renderer's shape
    #[must_use]
    pub fn grid_columns(&self) -> Vec<GridColumn> {
        self.visible_columns()
            .iter()
            .map(ColumnDescriptor::to_grid_column)
            .collect()
    }

    /// Id the next inserted row receives
    ///
    /// # Errors
    ///
    /// Returns a schema error once `u64::MAX` has been assigned
    pub fn next_row_id(&self) -> GridResult<RowId> {
        let max = self.rows.iter().map(Row::id).max();
        match max.max(self.high_water) {
            Some(id) => id.next().ok_or_else(|| {
                GridError::schema(format!("row ids of table {} are exhausted", self.id))
            }),
            None => Ok(RowId::default()),
        }
    }

    /// Insert a row through the editor
    ///
    /// The new row gets the next id. A foreign-key column named by `filter`
    /// is bound to the filter's parent row; other foreign-key columns stay
    /// empty and are reported back. Child-link cells get the added-row
    /// placeholder and plain columns take `partial_values` or stay empty.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `filter` names a column that is not a
    /// foreign key of this table, or if no row id is left
    pub fn insert_row(
        &mut self,
        partial_values: &IndexMap<String, CellValue>,
        filter: Option<&ActiveFilter>,
    ) -> GridResult<InsertedRow> {
        if let Some(filter) = filter {
            if !self.column(&filter.column).is_some_and(ColumnDescriptor::is_foreign_key) {
                return Err(GridError::schema(format!(
                    "filter column {} is not a foreign key of table {}",
                    filter.column, self.id
                )));
            }
        }

        let mut row = Row::new(self.next_row_id()?);
        let mut unbound_foreign_keys = Vec::new();
        for column in &self.columns {
            match column.kind {
                ColumnKind::Identifier | ColumnKind::ChildLink { .. } => {}
                ColumnKind::ForeignKey => match filter {
                    Some(f) if f.column == column.name => {
                        row.set(column.name.clone(), CellValue::from(f.parent_row_id));
                    }
                    _ => {
                        row.set(column.name.clone(), CellValue::empty());
                        unbound_foreign_keys.push(column.name.clone());
                    }
                },
                ColumnKind::Plain => {
                    let value = partial_values.get(&column.name).cloned().unwrap_or_default();
                    row.set(column.name.clone(), value);
                }
            }
        }
        for child in self.child_links.keys() {
            row.set(child_link_column_id(child), CellValue::from(ADDED_LINK_PLACEHOLDER));
        }

        self.append(row.clone());
        Ok(InsertedRow {
            row,
            unbound_foreign_keys,
        })
    }

    /// Load a row as-is, e.g. from an input file
    ///
    /// An integer `id` value is used as the row id; without one the next id
    /// is assigned. Missing columns are left empty.
    ///
    /// # Errors
    ///
    /// Returns a schema error for unknown columns, a non-integer id, or an
    /// id already present in the table
    pub fn push_row(&mut self, mut values: IndexMap<String, CellValue>) -> GridResult<RowId> {
        let id = match values.shift_remove(ID_COLUMN) {
            Some(value) => value.as_row_id().ok_or_else(|| {
                GridError::schema(format!(
                    "row id {} of table {} is not a non-negative integer",
                    value, self.id
                ))
            })?,
            None => self.next_row_id()?,
        };
        if self.row(id).is_some() {
            return Err(GridError::schema(format!(
                "duplicate row id {} in table {}",
                id, self.id
            )));
        }
        if let Some(unknown) = values.keys().find(|k| self.column(k).is_none()) {
            return Err(GridError::schema(format!(
                "unknown column {} in table {}",
                unknown, self.id
            )));
        }

        let mut row = Row::new(id);
        for column in self.columns.iter().filter(|c| c.name != ID_COLUMN) {
            let value = values.shift_remove(&column.name).unwrap_or_default();
            row.set(column.name.clone(), value);
        }
        for child in self.child_links.keys() {
            row.set(child_link_column_id(child), CellValue::from(LINK_PLACEHOLDER));
        }
        self.append(row);
        Ok(id)
    }

    fn append(&mut self, row: Row) {
        let id = row.id();
        self.high_water = Some(self.high_water.map_or(id, |h| h.max(id)));
        self.rows.push(row);
    }

    /// Overwrite one cell of an editable column
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown row, and a schema error for an
    /// unknown or read-only column
    pub fn update_cell(
        &mut self,
        row_id: RowId,
        column: &str,
        value: CellValue,
    ) -> GridResult<&Row> {
        match self.column(column) {
            Some(c) if c.editable => {}
            Some(_) => {
                return Err(GridError::schema(format!(
                    "column {} of table {} is not editable",
                    column, self.id
                )));
            }
            None => {
                return Err(GridError::schema(format!(
                    "unknown column {} in table {}",
                    column, self.id
                )));
            }
        }
        let id = self.id.clone();
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id() == row_id)
            .ok_or_else(|| GridError::row_not_found(&id, row_id))?;
        row.set(column, value);
        Ok(row)
    }

    /// Remove a row
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown row
    pub fn delete_row(&mut self, row_id: RowId) -> GridResult<Row> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id() == row_id)
            .ok_or_else(|| GridError::row_not_found(&self.id, row_id))?;
        Ok(self.rows.remove(index))
    }

    /// Project a row into the grid column-id namespace
    #[must_use]
    pub fn grid_record(&self, row: &Row) -> GridRecord {
        let mut record = GridRecord::new();
        for column in &self.columns {
            let value = row.get(&column.name).cloned().unwrap_or_default();
            record.insert(column.column_id(), value);
        }
        for child in self.child_links.keys() {
            let column_id = child_link_column_id(child);
            let value = row.get(&column_id).cloned().unwrap_or_default();
            record.insert(column_id, value);
        }
        record
    }

    /// All rows projected into the grid column-id namespace
    #[must_use]
    pub fn grid_records(&self) -> Vec<GridRecord> {
        self.rows.iter().map(|r| self.grid_record(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn users() -> RelationalTable {
        RelationalTable::new("users", "Users", ["name", "age"]).unwrap()
    }

    fn pets() -> RelationalTable {
        RelationalTable::new("pets", "Pets", ["name", "species", "user_id"]).unwrap()
    }

    fn linked() -> (RelationalTable, RelationalTable) {
        let mut users = users();
        let mut pets = pets();
        users.add_child_table(&mut pets, "user_id").unwrap();
        (users, pets)
    }

    #[test]
    fn test_new_table_has_id_column_first() {
        let table = RelationalTable::new("t", "T", ["id", "a"]).unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.columns()[0], ColumnDescriptor::identifier());
        assert!(table.is_empty());
    }

    #[test]
    fn test_new_table_rejects_duplicate_columns() {
        let result = RelationalTable::new("t", "T", ["a", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_child_table_links_both_sides() {
        let (users, pets) = linked();
        assert_eq!(users.child_links()["pets"].display_name, "Pets");
        assert_eq!(pets.parent_links()["users"].foreign_key_column, "user_id");
        assert!(pets.column("user_id").unwrap().is_foreign_key());
    }

    #[test]
    fn test_add_child_table_missing_column() {
        let mut users = users();
        let mut pets = pets();
        let err = users.add_child_table(&mut pets, "owner_id").unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);
        assert!(users.child_links().is_empty());
        assert!(pets.parent_links().is_empty());
    }

    #[test]
    fn test_add_child_table_twice_fails() {
        let (mut users, mut pets) = linked();
        let err = users.add_child_table(&mut pets, "user_id").unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);
    }

    #[test]
    fn test_visible_columns() {
        let (users, pets) = linked();

        let names: Vec<_> = users.visible_columns().into_iter().map(|c| c.column_id()).collect();
        assert_eq!(names, vec!["id", "name", "age", "!child_pets"]);

        let names: Vec<_> = pets.visible_columns().into_iter().map(|c| c.column_id()).collect();
        assert_eq!(names, vec!["id", "name", "species"]);

        let link = users.visible_columns().pop().unwrap();
        assert_eq!(link.name, "Pets");
        assert!(!link.editable);
    }

    #[test]
    fn test_insert_row_into_empty_table() {
        let mut table = users();
        let inserted = table.insert_row(&IndexMap::new(), None).unwrap();
        assert_eq!(inserted.row.id(), RowId::from_raw(0));
        assert_eq!(inserted.row.get("name"), Some(&CellValue::empty()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_row_uses_max_plus_one() {
        let mut table = users();
        let mut values = IndexMap::new();
        values.insert("id".to_string(), CellValue::Integer(5));
        table.push_row(values).unwrap();
        let mut values = IndexMap::new();
        values.insert("id".to_string(), CellValue::Integer(2));
        table.push_row(values).unwrap();

        let inserted = table.insert_row(&IndexMap::new(), None).unwrap();
        assert_eq!(inserted.row.id(), RowId::from_raw(6));
    }

    #[test]
    fn test_insert_row_binds_filtered_foreign_key() {
        let (_, mut pets) = linked();
        let filter = ActiveFilter::new("user_id", RowId::from_raw(7));
        let inserted = pets.insert_row(&IndexMap::new(), Some(&filter)).unwrap();
        assert_eq!(inserted.row.get("user_id"), Some(&CellValue::Integer(7)));
        assert!(inserted.unbound_foreign_keys.is_empty());
    }

    #[test]
    fn test_insert_row_without_filter_flags_foreign_key() {
        let (_, mut pets) = linked();
        let inserted = pets.insert_row(&IndexMap::new(), None).unwrap();
        assert_eq!(inserted.row.get("user_id"), Some(&CellValue::empty()));
        assert_eq!(inserted.unbound_foreign_keys, vec!["user_id".to_string()]);
    }

    #[test]
    fn test_insert_row_rejects_bad_filter_column() {
        let (_, mut pets) = linked();
        let filter = ActiveFilter::new("species", RowId::from_raw(1));
        let err = pets.insert_row(&IndexMap::new(), Some(&filter)).unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);
        assert!(pets.is_empty());
    }

    #[test]
    fn test_insert_row_partial_values_and_placeholders() {
        let (mut users, _) = linked();
        let mut partial = IndexMap::new();
        partial.insert("name".to_string(), CellValue::from("carol"));
        partial.insert("id".to_string(), CellValue::Integer(99));
        let inserted = users.insert_row(&partial, None).unwrap();

        assert_eq!(inserted.row.id(), RowId::from_raw(0));
        assert_eq!(inserted.row.get("name"), Some(&CellValue::from("carol")));
        assert_eq!(inserted.row.get("age"), Some(&CellValue::empty()));
        assert_eq!(
            inserted.row.get("!child_pets"),
            Some(&CellValue::from(ADDED_LINK_PLACEHOLDER))
        );
    }

    #[test]
    fn test_push_row_and_link_placeholder() {
        let mut users = users();
        let mut values = IndexMap::new();
        values.insert("name".to_string(), CellValue::from("alice"));
        users.push_row(values).unwrap();

        let mut pets = pets();
        users.add_child_table(&mut pets, "user_id").unwrap();
        let row = users.row(RowId::from_raw(0)).unwrap();
        assert_eq!(row.get("!child_pets"), Some(&CellValue::from(LINK_PLACEHOLDER)));
    }

    #[test]
    fn test_push_row_rejects_unknown_column_and_duplicates() {
        let mut table = users();
        let mut values = IndexMap::new();
        values.insert("colour".to_string(), CellValue::from("red"));
        assert!(table.push_row(values).is_err());

        let mut values = IndexMap::new();
        values.insert("id".to_string(), CellValue::Integer(1));
        table.push_row(values.clone()).unwrap();
        assert!(table.push_row(values).is_err());

        let mut values = IndexMap::new();
        values.insert("id".to_string(), CellValue::from("one"));
        assert!(table.push_row(values).is_err());
    }

    #[test]
    fn test_update_cell() {
        let (_, mut pets) = linked();
        pets.insert_row(&IndexMap::new(), None).unwrap();
        let row = pets
            .update_cell(RowId::from_raw(0), "species", CellValue::from("cat"))
            .unwrap();
        assert_eq!(row.get("species"), Some(&CellValue::from("cat")));

        let err = pets
            .update_cell(RowId::from_raw(0), "user_id", CellValue::Integer(1))
            .unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);

        let err = pets
            .update_cell(RowId::from_raw(0), "id", CellValue::Integer(1))
            .unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);

        let err = pets
            .update_cell(RowId::from_raw(4), "species", CellValue::from("cat"))
            .unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_row_does_not_reuse_id() {
        let mut table = users();
        table.insert_row(&IndexMap::new(), None).unwrap();
        table.insert_row(&IndexMap::new(), None).unwrap();
        let removed = table.delete_row(RowId::from_raw(1)).unwrap();
        assert_eq!(removed.id(), RowId::from_raw(1));
        assert_eq!(table.next_row_id().unwrap(), RowId::from_raw(2));
        assert!(table.delete_row(RowId::from_raw(1)).is_err());
    }

    #[test]
    fn test_insert_row_after_max_row_id_fails() {
        let mut table = users();
        let mut values = IndexMap::new();
        values.insert("id".to_string(), CellValue::Integer(u64::MAX));
        table.push_row(values).unwrap();

        let err = table.insert_row(&IndexMap::new(), None).unwrap_err();
        assert_eq!(err.kind(), relgrid_core::ErrorKind::Schema);
        assert!(table.push_row(IndexMap::new()).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_grid_records_use_column_ids() {
        let (mut users, mut pets) = linked();
        users.insert_row(&IndexMap::new(), None).unwrap();
        let filter = ActiveFilter::new("user_id", RowId::from_raw(0));
        pets.insert_row(&IndexMap::new(), Some(&filter)).unwrap();

        let record = &pets.grid_records()[0];
        assert_eq!(record.get("!fk_user_id"), Some(&CellValue::Integer(0)));
        assert!(record.get("user_id").is_none());

        let record = &users.grid_records()[0];
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "age", "!child_pets"]);
    }

    #[test]
    fn test_filtered_rows() {
        let (_, mut pets) = linked();
        let first = ActiveFilter::new("user_id", RowId::from_raw(0));
        let second = ActiveFilter::new("user_id", RowId::from_raw(1));
        pets.insert_row(&IndexMap::new(), Some(&first)).unwrap();
        pets.insert_row(&IndexMap::new(), Some(&second)).unwrap();
        pets.insert_row(&IndexMap::new(), Some(&second)).unwrap();

        assert_eq!(pets.filtered_rows(None).len(), 3);
        assert_eq!(pets.filtered_rows(Some(&first)).len(), 1);
        assert_eq!(pets.filtered_rows(Some(&second)).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_insert_row_id_is_max_plus_one(ids in proptest::collection::btree_set(0u64..1000, 0..20)) {
            let mut table = RelationalTable::new("t", "T", ["a"]).unwrap();
            for id in &ids {
                let mut values = IndexMap::new();
                values.insert("id".to_string(), CellValue::Integer(*id));
                table.push_row(values).unwrap();
            }
            let expected = ids.iter().max().map_or(0, |m| m + 1);
            let inserted = table.insert_row(&IndexMap::new(), None).unwrap();
            prop_assert_eq!(inserted.row.id(), RowId::from_raw(expected));
        }

        #[test]
        fn prop_repeated_inserts_are_sequential(count in 1usize..30) {
            let mut table = RelationalTable::new("t", "T", ["a"]).unwrap();
            for i in 0..count {
                let inserted = table.insert_row(&IndexMap::new(), None).unwrap();
                prop_assert_eq!(inserted.row.id(), RowId::from_raw(i as u64));
            }
        }
    }
}

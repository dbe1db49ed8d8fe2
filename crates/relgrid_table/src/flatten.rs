//! Flattening of nested records into linked tables.
//!
//! The input is a JSON object of named records. Each record becomes a row
//! (its key stored in the `name` column); scalar fields become columns, and
//! fields named after a table in the schema hold the nested records of that
//! child table. Row ids are assigned sequentially per table in traversal order.

use crate::column::ID_COLUMN;
use crate::registry::TableRegistry;
use crate::table::RelationalTable;
use indexmap::IndexMap;
use relgrid_core::{CellValue, GridError, GridResult, RowId, TableId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column holding each record's key
pub const NAME_COLUMN: &str = "name";

/// Schema entry for one flattened table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Display name, defaults to the table id
    #[serde(default, alias = "table_name")]
    pub display_name: Option<String>,
    /// Parent table, absent for the root table
    #[serde(default, alias = "parent_table", alias = "parent")]
    pub parent_table_id: Option<TableId>,
    /// Column of this table holding the parent row id
    #[serde(default, alias = "fk_column", alias = "fk")]
    pub foreign_key_column: Option<String>,
}

impl TableSpec {
    /// Child table spec
    #[must_use]
    pub fn child_of(parent: impl Into<TableId>, foreign_key_column: impl Into<String>) -> Self {
        Self {
            display_name: None,
            parent_table_id: Some(parent.into()),
            foreign_key_column: Some(foreign_key_column.into()),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Table id to table spec, in display order
pub type FlattenSchema = IndexMap<TableId, TableSpec>;

/// Flatten nested records into a registry of linked tables
///
/// Tables are registered in schema order; `root_table` holds the top-level
/// records.
///
/// # Errors
///
/// Returns a schema error if the schema is inconsistent (unknown root or
/// parent, missing foreign-key column) or the data does not have the
/// expected shape
pub fn flatten(
    data: &Value,
    root_table: &TableId,
    schema: &FlattenSchema,
) -> GridResult<TableRegistry> {
    if !schema.contains_key(root_table) {
        return Err(GridError::schema(format!(
            "root table {} is not part of the schema",
            root_table
        )));
    }

    let mut registry = TableRegistry::new();
    for (id, spec) in schema {
        let display_name = spec.display_name.clone().unwrap_or_else(|| id.to_string());
        let mut columns = vec![NAME_COLUMN.to_string()];
        if spec.parent_table_id.is_some() {
            let fk = foreign_key_of(id, spec)?;
            columns.push(fk.to_string());
        }
        registry.register(RelationalTable::new(id.clone(), display_name, columns)?)?;
    }
    for (id, spec) in schema {
        if let Some(parent) = &spec.parent_table_id {
            if !schema.contains_key(parent) {
                return Err(GridError::schema(format!(
                    "parent {} of table {} is not part of the schema",
                    parent, id
                )));
            }
            registry.link(parent, id, foreign_key_of(id, spec)?)?;
        }
    }

    read_records(&mut registry, schema, data, root_table, None)?;
    Ok(registry)
}

fn foreign_key_of<'a>(id: &TableId, spec: &'a TableSpec) -> GridResult<&'a str> {
    spec.foreign_key_column.as_deref().ok_or_else(|| {
        GridError::schema(format!("table {} has a parent but no foreign key column", id))
    })
}

fn read_records(
    registry: &mut TableRegistry,
    schema: &FlattenSchema,
    data: &Value,
    table_id: &TableId,
    parent_row: Option<RowId>,
) -> GridResult<()> {
    let records = data.as_object().ok_or_else(|| {
        GridError::schema(format!("records of table {} must be an object", table_id))
    })?;

    for (row_name, record) in records {
        let fields = record.as_object().ok_or_else(|| {
            GridError::schema(format!(
                "record {} of table {} must be an object",
                row_name, table_id
            ))
        })?;

        let mut values = IndexMap::new();
        values.insert(NAME_COLUMN.to_string(), CellValue::from(row_name.as_str()));
        if let Some(parent_row) = parent_row {
            let spec = &schema[table_id];
            values.insert(foreign_key_of(table_id, spec)?.to_string(), CellValue::from(parent_row));
        }

        let mut nested = Vec::new();
        let table = registry.get_mut(table_id)?;
        for (key, item) in fields {
            let child = TableId::from(key.as_str());
            if let Some(child_spec) = schema.get(&child) {
                if child_spec.parent_table_id.as_ref() != Some(table_id) {
                    return Err(GridError::schema(format!(
                        "table {} is not a child of {}",
                        child, table_id
                    )));
                }
                nested.push((child, item));
                continue;
            }
            if key == ID_COLUMN {
                return Err(GridError::schema(format!(
                    "record {} of table {} uses the reserved field {}",
                    row_name, table_id, ID_COLUMN
                )));
            }
            table.ensure_column(key)?;
            values.insert(key.clone(), CellValue::Text(leaf_text(item)));
        }

        let row_id = table.push_row(values)?;
        for (child, item) in nested {
            read_records(registry, schema, item, &child, Some(row_id))?;
        }
    }
    Ok(())
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

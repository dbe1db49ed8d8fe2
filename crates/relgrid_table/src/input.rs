//! Editor input files.

use crate::column::ID_COLUMN;
use crate::flatten::{flatten, FlattenSchema};
use crate::registry::TableRegistry;
use crate::table::RelationalTable;
use indexmap::{IndexMap, IndexSet};
use relgrid_core::{CellValue, GridResult, TableId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parent wiring of an explicitly listed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInput {
    /// Parent table id
    pub table: TableId,
    /// Column of this table holding the parent row id
    #[serde(alias = "fk_column")]
    pub foreign_key: String,
}

/// One explicitly listed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInput {
    /// Table id
    pub id: TableId,
    /// Display name, defaults to the id
    #[serde(default, alias = "table_name")]
    pub display_name: Option<String>,
    /// Declared columns; columns found in rows are appended
    #[serde(default)]
    pub columns: Vec<String>,
    /// Rows keyed by column name
    #[serde(default)]
    pub rows: Vec<IndexMap<String, Value>>,
    /// Parent wiring
    #[serde(default)]
    pub parent: Option<ParentInput>,
}

/// Initial contents of an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditorInput {
    /// Tables listed one by one with explicit parent wiring
    Tables {
        /// Tables in display order
        tables: Vec<TableInput>,
    },
    /// Nested records flattened through a schema
    Nested {
        /// Table holding the top-level records
        root_table: TableId,
        /// Table id to table spec, in display order
        schema: FlattenSchema,
        /// The nested records
        data: Value,
    },
}

impl EditorInput {
    /// Parse an input document
    ///
    /// # Errors
    ///
    /// Returns a schema error for malformed JSON
    pub fn from_json_str(s: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Build and validate the registry described by this input
    ///
    /// # Errors
    ///
    /// Returns an error if a table, row, or link is malformed
    pub fn into_registry(self) -> GridResult<TableRegistry> {
        let registry = match self {
            Self::Tables { tables } => build_tables(tables)?,
            Self::Nested {
                root_table,
                schema,
                data,
            } => flatten(&data, &root_table, &schema)?,
        };
        registry.validate_links()?;
        Ok(registry)
    }
}

fn build_tables(tables: Vec<TableInput>) -> GridResult<TableRegistry> {
    let mut registry = TableRegistry::new();
    let mut pending_rows = Vec::new();

    for input in tables {
        let mut columns: IndexSet<String> = input.columns.iter().cloned().collect();
        if let Some(parent) = &input.parent {
            columns.insert(parent.foreign_key.clone());
        }
        for row in &input.rows {
            columns.extend(row.keys().cloned());
        }
        columns.shift_remove(ID_COLUMN);

        let display_name = input.display_name.unwrap_or_else(|| input.id.to_string());
        registry.register(RelationalTable::new(input.id.clone(), display_name, columns)?)?;
        pending_rows.push((input.id, input.parent, input.rows));
    }

    for (id, parent, _) in &pending_rows {
        if let Some(parent) = parent {
            registry.link(&parent.table, id, &parent.foreign_key)?;
        }
    }

    for (id, _, rows) in pending_rows {
        let table = registry.get_mut(&id)?;
        for row in rows {
            let values = row
                .iter()
                .map(|(column, value)| (column.clone(), CellValue::from_json(value)))
                .collect();
            table.push_row(values)?;
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgrid_core::{ErrorKind, RowId};

    const TABLES: &str = r#"{
        "tables": [
            {"id": "users", "display_name": "Users", "columns": ["name"],
             "rows": [{"id": 0, "name": "alice"}, {"id": 4, "name": "bob"}]},
            {"id": "pets", "table_name": "Pets", "columns": ["name"],
             "parent": {"table": "users", "fk_column": "user_id"},
             "rows": [{"name": "rex", "user_id": 4}]}
        ]
    }"#;

    #[test]
    fn test_tables_input() {
        let registry = EditorInput::from_json_str(TABLES).unwrap().into_registry().unwrap();
        assert_eq!(registry.len(), 2);

        let users = registry.get(&TableId::from("users")).unwrap();
        assert_eq!(users.display_name(), "Users");
        assert_eq!(users.len(), 2);
        assert!(users.row(RowId::from_raw(4)).is_some());

        let pets = registry.get(&TableId::from("pets")).unwrap();
        assert_eq!(pets.display_name(), "Pets");
        assert!(pets.column("user_id").unwrap().is_foreign_key());
        assert_eq!(pets.rows()[0].get("user_id"), Some(&CellValue::Integer(4)));
        assert_eq!(pets.rows()[0].id(), RowId::from_raw(0));
    }

    #[test]
    fn test_tables_input_link_placeholders() {
        let registry = EditorInput::from_json_str(TABLES).unwrap().into_registry().unwrap();
        let users = registry.get(&TableId::from("users")).unwrap();
        let record = &users.grid_records()[1];
        assert_eq!(record.get("!child_pets"), Some(&CellValue::from("Click me!")));
    }

    #[test]
    fn test_nested_input() {
        let input = r#"{
            "root_table": "users",
            "schema": {
                "users": {"table_name": "Users"},
                "pets": {"table_name": "Pets", "parent_table": "users", "fk_column": "user_id"}
            },
            "data": {"alice": {"age": "30", "pets": {"rex": {"species": "dog"}}}}
        }"#;
        let input = EditorInput::from_json_str(input).unwrap();
        assert!(matches!(input, EditorInput::Nested { .. }));

        let registry = input.into_registry().unwrap();
        assert_eq!(registry.first().unwrap().display_name(), "Users");
        assert_eq!(registry.get(&TableId::from("pets")).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_parent_fails() {
        let input = r#"{"tables": [
            {"id": "pets", "parent": {"table": "users", "foreign_key": "user_id"}}
        ]}"#;
        let err = EditorInput::from_json_str(input).unwrap().into_registry().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        let err = EditorInput::from_json_str("{\"tables\": 3}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}

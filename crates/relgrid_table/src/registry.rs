//! Table registry for one editing session.

use crate::column::ColumnKind;
use crate::table::RelationalTable;
use indexmap::IndexMap;
use relgrid_core::{GridError, GridResult, TableId};

/// Registry owning every table of a session
///
/// Registration order is display order: the first registered table is the
/// one shown when the session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRegistry {
    /// Registered tables by id
    tables: IndexMap<TableId, RelationalTable>,
}

impl TableRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
        }
    }

    /// Register a table
    ///
    /// # Errors
    ///
    /// Returns a schema error if a table with the same id is registered
    pub fn register(&mut self, table: RelationalTable) -> GridResult<()> {
        if self.tables.contains_key(table.id()) {
            return Err(GridError::schema(format!(
                "table {} already registered",
                table.id()
            )));
        }
        self.tables.insert(table.id().clone(), table);
        Ok(())
    }

    /// Get a table by id
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown ids
    pub fn get(&self, id: &TableId) -> GridResult<&RelationalTable> {
        self.tables
            .get(id)
            .ok_or_else(|| GridError::table_not_found(id))
    }

    /// Get a table by id for mutation
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown ids
    pub fn get_mut(&mut self, id: &TableId) -> GridResult<&mut RelationalTable> {
        self.tables
            .get_mut(id)
            .ok_or_else(|| GridError::table_not_found(id))
    }

    /// All tables in registration order
    pub fn all(&self) -> impl Iterator<Item = &RelationalTable> {
        self.tables.values()
    }

    /// The first registered table
    #[must_use]
    pub fn first(&self) -> Option<&RelationalTable> {
        self.tables.values().next()
    }

    /// Registration position of a table
    #[must_use]
    pub fn position(&self, id: &TableId) -> Option<usize> {
        self.tables.get_index_of(id)
    }

    /// Check if a table is registered
    #[must_use]
    pub fn contains(&self, id: &TableId) -> bool {
        self.tables.contains_key(id)
    }

    /// Number of registered tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Link two registered tables as parent and child
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tables and a schema error for a bad
    /// foreign-key column or an existing link
    pub fn link(
        &mut self,
        parent: &TableId,
        child: &TableId,
        foreign_key_column: &str,
    ) -> GridResult<()> {
        let child_name = {
            let parent_table = self.get(parent)?;
            let child_table = self.get(child)?;
            parent_table.check_child_link(child_table, foreign_key_column)?;
            child_table.display_name().to_string()
        };
        self.get_mut(parent)?.attach_child(child.clone(), child_name);
        self.get_mut(child)?
            .attach_parent(parent.clone(), foreign_key_column);
        Ok(())
    }

    /// Foreign-key column of `child` that refers to `parent`
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown child table and a link error if the
    /// child has no parent link to `parent`
    pub fn resolve_child_filter_column(
        &self,
        parent: &TableId,
        child: &TableId,
    ) -> GridResult<&str> {
        self.get(child)?
            .parent_links()
            .get(parent)
            .map(|link| link.foreign_key_column.as_str())
            .ok_or_else(|| GridError::Link {
                parent: parent.clone(),
                child: child.clone(),
            })
    }

    /// Check that every link is registered on both ends
    ///
    /// Each child link must point at a registered table that lists this table
    /// as parent through an existing foreign-key column, and each parent link
    /// must be mirrored by the parent's child link.
    ///
    /// # Errors
    ///
    /// Returns a schema error describing the first broken link
    pub fn validate_links(&self) -> GridResult<()> {
        for table in self.tables.values() {
            for child_id in table.child_links().keys() {
                let child = self.tables.get(child_id).ok_or_else(|| {
                    GridError::schema(format!(
                        "table {} links to unregistered child {}",
                        table.id(),
                        child_id
                    ))
                })?;
                let link = child.parent_links().get(table.id()).ok_or_else(|| {
                    GridError::schema(format!(
                        "child {} does not list {} as parent",
                        child_id,
                        table.id()
                    ))
                })?;
                let column_ok = child
                    .column(&link.foreign_key_column)
                    .is_some_and(|c| c.kind == ColumnKind::ForeignKey);
                if !column_ok {
                    return Err(GridError::schema(format!(
                        "foreign key column {} missing from table {}",
                        link.foreign_key_column, child_id
                    )));
                }
            }
            for parent_id in table.parent_links().keys() {
                let mirrored = self
                    .tables
                    .get(parent_id)
                    .is_some_and(|p| p.child_links().contains_key(table.id()));
                if !mirrored {
                    return Err(GridError::schema(format!(
                        "parent {} of table {} does not link back",
                        parent_id,
                        table.id()
                    )));
                }
            }
        }
        Ok(())
    }
}

//! Layout description handed to a renderer.

use crate::output::Visibility;
use crate::state::ViewState;
use relgrid_core::TableId;
use relgrid_table::{GridColumn, GridRecord, TableRegistry};
use serde::{Deserialize, Serialize};

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Rows per grid page
    pub page_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl LayoutConfig {
    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One table container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Table id
    pub table_id: TableId,
    /// Position in registration order
    pub table_number: usize,
    /// Header text
    pub header: String,
    /// Visible grid columns
    pub columns: Vec<GridColumn>,
    /// Every row of the table
    pub records: Vec<GridRecord>,
    /// Display state
    pub display: Visibility,
    /// Filter expression, if a filter is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_predicate: Option<String>,
    /// Whether the container has a close button
    pub closable: bool,
    /// Rows per page
    pub page_size: usize,
}

/// Every table container, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Table containers
    pub tables: Vec<TableLayout>,
}

impl Layout {
    /// Describe the tables of `registry` as `view` displays them
    ///
    /// The first table is the entry point of the editor and never gets a
    /// close button.
    #[must_use]
    pub fn build(registry: &TableRegistry, view: &ViewState, config: &LayoutConfig) -> Self {
        let tables = registry
            .all()
            .enumerate()
            .map(|(number, table)| TableLayout {
                table_id: table.id().clone(),
                table_number: number,
                header: table.display_name().to_string(),
                columns: table.grid_columns(),
                records: table.grid_records(),
                display: Visibility::from_shown(view.is_visible(table.id())),
                filter_predicate: view.active_filter(table.id()).map(|f| f.predicate()),
                closable: number != 0,
                page_size: config.page_size,
            })
            .collect();
        Self { tables }
    }

    /// Layout of one table
    #[must_use]
    pub fn table(&self, id: &TableId) -> Option<&TableLayout> {
        self.tables.iter().find(|t| &t.table_id == id)
    }
}

//! Action engine: UI events in, view changes and table updates out.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::event::{ActiveCell, UiEvent};
use crate::layout::{Layout, LayoutConfig};
use crate::output::{EventOutput, OutputBuilder, Visibility};
use crate::state::ViewState;
use indexmap::IndexMap;
use relgrid_core::{CellValue, GridError, GridResult, RowId, TableId};
use relgrid_table::{ActiveFilter, ColumnRef, GridRecord, TableRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Report "no update" resolutions at info level instead of debug
    pub verbose_no_update: bool,
}

impl EngineConfig {
    /// Set verbose "no update" reporting
    #[must_use]
    pub fn with_verbose_no_update(mut self, verbose: bool) -> Self {
        self.verbose_no_update = verbose;
        self
    }
}

/// State machine of one editing session
///
/// Owns the session's tables and view state. Events are handled one at a
/// time, each to completion, through [`ActionEngine::dispatch`].
pub struct ActionEngine {
    registry: TableRegistry,
    view: ViewState,
    config: EngineConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl ActionEngine {
    /// Start a session over the given tables
    #[must_use]
    pub fn new(registry: TableRegistry) -> Self {
        let view = ViewState::new(&registry);
        Self {
            registry,
            view,
            config: EngineConfig::default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set diagnostic sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Tables of the session
    #[must_use]
    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Current view state
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Describe every table as currently displayed
    #[must_use]
    pub fn layout(&self, config: &LayoutConfig) -> Layout {
        Layout::build(&self.registry, &self.view, config)
    }

    /// Handle one UI event
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tables or rows, a link error when a
    /// child-link cell names a table that is not a child of the clicked one,
    /// and a schema error if a stored filter no longer fits its table
    pub fn dispatch(&mut self, event: &UiEvent) -> GridResult<EventOutput> {
        self.sink.record(Diagnostic::debug(format!(
            "{} on table {}",
            event.name(),
            event.table_id()
        )));

        match event {
            UiEvent::CellActivated {
                table_id,
                active_cell,
            } => self.cell_activated(table_id, active_cell.as_ref()),
            UiEvent::CloseTableClicked { table_id } => self.close_table(table_id),
            UiEvent::AddRowClicked { table_id } => self.add_row(table_id),
        }
    }

    fn cell_activated(
        &mut self,
        table_id: &TableId,
        cell: Option<&ActiveCell>,
    ) -> GridResult<EventOutput> {
        let Some(cell) = cell else {
            return Ok(self.no_update("no active cell"));
        };
        let parent = self.registry.get(table_id)?;
        let column = ColumnRef::parse(&cell.column_id);
        let Some(child_id) = column.child_table() else {
            return Ok(self.no_update("activated cell is not a child link"));
        };
        if parent.row(cell.row_id).is_none() {
            return Err(GridError::row_not_found(table_id, cell.row_id));
        }
        let foreign_key = self
            .registry
            .resolve_child_filter_column(table_id, child_id)?;

        let filter = ActiveFilter::new(foreign_key, cell.row_id);
        let predicate = filter.predicate();
        self.view.show(child_id, Some(filter));

        Ok(OutputBuilder::new()
            .display(child_id, Visibility::Shown)
            .filter(child_id, predicate)
            .build())
    }

    fn close_table(&mut self, table_id: &TableId) -> GridResult<EventOutput> {
        self.registry.get(table_id)?;
        self.view.hide(table_id);
        Ok(OutputBuilder::new()
            .display(table_id, Visibility::Hidden)
            .build())
    }

    fn add_row(&mut self, table_id: &TableId) -> GridResult<EventOutput> {
        let filter = self.view.active_filter(table_id).cloned();
        let table = self.registry.get_mut(table_id)?;
        let inserted = table.insert_row(&IndexMap::new(), filter.as_ref())?;
        let rows = table.grid_records();

        if !inserted.unbound_foreign_keys.is_empty() {
            self.sink.record(Diagnostic::warn(format!(
                "row {} of table {} has no value for foreign key(s) {}",
                inserted.row.id(),
                table_id,
                inserted.unbound_foreign_keys.join(", ")
            )));
        }

        Ok(OutputBuilder::new().rows(table_id, rows).build())
    }

    fn no_update(&self, reason: &str) -> EventOutput {
        let diagnostic = if self.config.verbose_no_update {
            Diagnostic::info(format!("no update: {}", reason))
        } else {
            Diagnostic::debug(format!("no update: {}", reason))
        };
        self.sink.record(diagnostic);
        EventOutput::no_update()
    }

    /// Write an edited cell back into its table
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tables or rows and a schema error for
    /// read-only or unknown columns
    pub fn update_cell(
        &mut self,
        table_id: &TableId,
        row_id: RowId,
        column: &str,
        value: CellValue,
    ) -> GridResult<GridRecord> {
        let table = self.registry.get_mut(table_id)?;
        let row = table.update_cell(row_id, column, value)?.clone();
        Ok(table.grid_record(&row))
    }

    /// Delete a row and return the table's full dataset
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tables or rows
    pub fn delete_row(&mut self, table_id: &TableId, row_id: RowId) -> GridResult<EventOutput> {
        let table = self.registry.get_mut(table_id)?;
        table.delete_row(row_id)?;
        let rows = table.grid_records();
        self.sink.record(Diagnostic::debug(format!(
            "deleted row {} of table {}",
            row_id, table_id
        )));
        Ok(OutputBuilder::new().rows(table_id, rows).build())
    }
}

impl std::fmt::Debug for ActionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEngine")
            .field("tables", &self.registry.len())
            .field("view", &self.view)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

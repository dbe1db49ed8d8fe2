//! UI events.

use relgrid_core::{RowId, TableId};
use serde::{Deserialize, Serialize};

/// Cell the user activated in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCell {
    /// Id of the row holding the cell
    pub row_id: RowId,
    /// Grid column id of the cell
    pub column_id: String,
}

/// One physical user action; exactly one is handled per dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A cell of a table was clicked; `active_cell` is absent when the click
    /// did not land on a cell
    CellActivated {
        /// Table that was clicked
        table_id: TableId,
        /// The activated cell
        #[serde(default)]
        active_cell: Option<ActiveCell>,
    },
    /// The close button of a table was clicked
    CloseTableClicked {
        /// Table to close
        table_id: TableId,
    },
    /// The add-row button of a table was clicked
    AddRowClicked {
        /// Table to add a row to
        table_id: TableId,
    },
}

impl UiEvent {
    /// Cell activation at `row_id`/`column_id`
    #[must_use]
    pub fn cell(table_id: impl Into<TableId>, row_id: RowId, column_id: impl Into<String>) -> Self {
        Self::CellActivated {
            table_id: table_id.into(),
            active_cell: Some(ActiveCell {
                row_id,
                column_id: column_id.into(),
            }),
        }
    }

    /// Table that originated the event
    #[must_use]
    pub fn table_id(&self) -> &TableId {
        match self {
            Self::CellActivated { table_id, .. }
            | Self::CloseTableClicked { table_id }
            | Self::AddRowClicked { table_id } => table_id,
        }
    }

    /// Short event name for diagnostics
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CellActivated { .. } => "cell_activated",
            Self::CloseTableClicked { .. } => "close_table_clicked",
            Self::AddRowClicked { .. } => "add_row_clicked",
        }
    }
}

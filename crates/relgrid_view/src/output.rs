//! Per-event renderer updates.
//!
//! An [`EventOutput`] only holds entries for tables an event actually
//! changed. Every other table reads as "no update", so a renderer leaves
//! their local state (unsaved edits, scroll position) alone.

use indexmap::IndexMap;
use relgrid_core::TableId;
use relgrid_table::GridRecord;
use serde::{Deserialize, Serialize};

/// Display state of a table container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Displayed (`display: block`)
    #[serde(rename = "block")]
    Shown,
    /// Hidden (`display: none`)
    #[serde(rename = "none")]
    Hidden,
}

impl Visibility {
    /// Visibility for a shown flag
    #[must_use]
    pub fn from_shown(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }
}

/// Changes to one table; absent fields are not updated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDelta {
    /// New display state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Visibility>,
    /// New row filter expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_predicate: Option<String>,
    /// Full replacement dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<GridRecord>>,
}

static NO_UPDATE: TableDelta = TableDelta {
    display: None,
    filter_predicate: None,
    rows: None,
};

impl TableDelta {
    /// Check if nothing changes
    #[must_use]
    pub fn is_no_update(&self) -> bool {
        self.display.is_none() && self.filter_predicate.is_none() && self.rows.is_none()
    }
}

/// Updates produced by one event, keyed by table id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventOutput {
    tables: IndexMap<TableId, TableDelta>,
}

impl EventOutput {
    /// Output changing nothing
    #[must_use]
    pub fn no_update() -> Self {
        Self::default()
    }

    /// Check if no table changes
    #[must_use]
    pub fn is_no_update(&self) -> bool {
        self.tables.values().all(TableDelta::is_no_update)
    }

    /// Delta for a table; "no update" for untouched tables
    #[must_use]
    pub fn get(&self, table: &TableId) -> &TableDelta {
        self.tables.get(table).unwrap_or(&NO_UPDATE)
    }

    /// Tables with a pending change
    pub fn touched(&self) -> impl Iterator<Item = &TableId> {
        self.tables
            .iter()
            .filter(|(_, delta)| !delta.is_no_update())
            .map(|(id, _)| id)
    }
}

/// Builder starting from "no update" for every table
#[derive(Debug, Default)]
pub struct OutputBuilder {
    tables: IndexMap<TableId, TableDelta>,
}

impl OutputBuilder {
    /// Create a builder with no changes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, table: &TableId) -> &mut TableDelta {
        self.tables.entry(table.clone()).or_default()
    }

    /// Set the display state of a table
    #[must_use]
    pub fn display(mut self, table: &TableId, display: Visibility) -> Self {
        self.entry(table).display = Some(display);
        self
    }

    /// Set the filter expression of a table
    #[must_use]
    pub fn filter(mut self, table: &TableId, predicate: String) -> Self {
        self.entry(table).filter_predicate = Some(predicate);
        self
    }

    /// Replace the dataset of a table
    #[must_use]
    pub fn rows(mut self, table: &TableId, rows: Vec<GridRecord>) -> Self {
        self.entry(table).rows = Some(rows);
        self
    }

    /// Finish the output
    #[must_use]
    pub fn build(self) -> EventOutput {
        EventOutput {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_update() {
        let output = EventOutput::no_update();
        assert!(output.is_no_update());
        assert!(output.get(&TableId::from("users")).is_no_update());
        assert_eq!(output.touched().count(), 0);
    }

    #[test]
    fn test_builder_touches_only_named_tables() {
        let pets = TableId::from("pets");
        let output = OutputBuilder::new()
            .display(&pets, Visibility::Shown)
            .filter(&pets, "{!fk_user_id}=1".to_string())
            .build();

        assert!(!output.is_no_update());
        assert_eq!(output.get(&pets).display, Some(Visibility::Shown));
        assert!(output.get(&TableId::from("users")).is_no_update());
        let touched: Vec<_> = output.touched().cloned().collect();
        assert_eq!(touched, vec![pets]);
    }

    #[test]
    fn test_output_serialization_omits_unchanged_fields() {
        let pets = TableId::from("pets");
        let users = TableId::from("users");
        let output = OutputBuilder::new()
            .display(&pets, Visibility::Hidden)
            .rows(&users, Vec::new())
            .build();
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({"pets": {"display": "none"}, "users": {"rows": []}})
        );
    }

    #[test]
    fn test_visibility_from_shown() {
        assert_eq!(Visibility::from_shown(true), Visibility::Shown);
        assert_eq!(Visibility::from_shown(false), Visibility::Hidden);
        assert_eq!(serde_json::to_string(&Visibility::Shown).unwrap(), "\"block\"");
    }
}

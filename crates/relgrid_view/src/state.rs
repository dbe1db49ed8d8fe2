//! Per-session view state.

use indexmap::IndexMap;
use relgrid_core::TableId;
use relgrid_table::{ActiveFilter, TableRegistry};
use serde::{Deserialize, Serialize};

/// Which tables are displayed and which rows each one shows
///
/// A fresh state shows exactly the first registered table, with no filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Visibility by table id
    visibility: IndexMap<TableId, bool>,
    /// Active row filter by table id
    active_filter: IndexMap<TableId, Option<ActiveFilter>>,
}

impl ViewState {
    /// Initial state for the tables of a registry
    #[must_use]
    pub fn new(registry: &TableRegistry) -> Self {
        let mut state = Self::default();
        for (position, table) in registry.all().enumerate() {
            state.visibility.insert(table.id().clone(), position == 0);
            state.active_filter.insert(table.id().clone(), None);
        }
        state
    }

    /// Display a table with the given filter
    pub fn show(&mut self, table: &TableId, filter: Option<ActiveFilter>) {
        self.visibility.insert(table.clone(), true);
        self.active_filter.insert(table.clone(), filter);
    }

    /// Stop displaying a table
    ///
    /// The stored filter is kept; only a later `show` replaces it.
    pub fn hide(&mut self, table: &TableId) {
        self.visibility.insert(table.clone(), false);
    }

    /// Check if a table is displayed
    #[must_use]
    pub fn is_visible(&self, table: &TableId) -> bool {
        self.visibility.get(table).copied().unwrap_or(false)
    }

    /// Active filter of a table
    #[must_use]
    pub fn active_filter(&self, table: &TableId) -> Option<&ActiveFilter> {
        self.active_filter.get(table).and_then(Option::as_ref)
    }

    /// Displayed tables, in registration order
    pub fn visible_tables(&self) -> impl Iterator<Item = &TableId> {
        self.visibility
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(id, _)| id)
    }

    /// Visibility of every known table
    #[must_use]
    pub fn visibility(&self) -> &IndexMap<TableId, bool> {
        &self.visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgrid_core::RowId;
    use relgrid_table::RelationalTable;

    fn registry() -> TableRegistry {
        let mut registry = TableRegistry::new();
        for id in ["users", "pets", "cars"] {
            registry
                .register(RelationalTable::new(id, id, Vec::<String>::new()).unwrap())
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_initial_state_shows_first_table_only() {
        let state = ViewState::new(&registry());
        assert!(state.is_visible(&TableId::from("users")));
        assert!(!state.is_visible(&TableId::from("pets")));
        assert!(!state.is_visible(&TableId::from("cars")));
        assert!(state.active_filter(&TableId::from("users")).is_none());
        assert_eq!(state.visibility().len(), 3);
        let visible: Vec<_> = state.visible_tables().cloned().collect();
        assert_eq!(visible, vec![TableId::from("users")]);
    }

    #[test]
    fn test_initial_state_of_empty_registry() {
        let state = ViewState::new(&TableRegistry::new());
        assert_eq!(state.visible_tables().count(), 0);
    }

    #[test]
    fn test_show_sets_filter() {
        let mut state = ViewState::new(&registry());
        let pets = TableId::from("pets");
        let filter = ActiveFilter::new("user_id", RowId::from_raw(2));
        state.show(&pets, Some(filter.clone()));
        assert!(state.is_visible(&pets));
        assert_eq!(state.active_filter(&pets), Some(&filter));
    }

    #[test]
    fn test_hide_keeps_filter() {
        let mut state = ViewState::new(&registry());
        let pets = TableId::from("pets");
        let filter = ActiveFilter::new("user_id", RowId::from_raw(2));
        state.show(&pets, Some(filter.clone()));
        state.hide(&pets);
        assert!(!state.is_visible(&pets));
        assert_eq!(state.active_filter(&pets), Some(&filter));
    }

    #[test]
    fn test_show_replaces_filter() {
        let mut state = ViewState::new(&registry());
        let pets = TableId::from("pets");
        state.show(&pets, Some(ActiveFilter::new("user_id", RowId::from_raw(2))));
        state.hide(&pets);
        state.show(&pets, Some(ActiveFilter::new("user_id", RowId::from_raw(5))));
        assert_eq!(
            state.active_filter(&pets).map(|f| f.parent_row_id),
            Some(RowId::from_raw(5))
        );
    }

    #[test]
    fn test_unknown_table_is_hidden() {
        let state = ViewState::new(&registry());
        assert!(!state.is_visible(&TableId::from("ghosts")));
    }
}

//! Column descriptors and the grid column-id encoding.
//!
//! The data model keeps column kinds as typed flags. The grid renderer only
//! sees column ids, where foreign-key columns carry a `!fk_` prefix and
//! synthetic child-link columns are named `!child_<childTableId>`. Both
//! prefixes are part of the renderer contract and must not change.

use relgrid_core::{GridError, GridResult, TableId};
use serde::{Deserialize, Serialize};

/// Name and column id of the primary-key column
pub const ID_COLUMN: &str = "id";

/// Column-id prefix of foreign-key columns
pub const FOREIGN_KEY_PREFIX: &str = "!fk_";

/// Column-id prefix of synthetic child-link columns
pub const CHILD_LINK_PREFIX: &str = "!child_";

/// Child-link cell text for rows present when the link was created
pub const LINK_PLACEHOLDER: &str = "Click me!";

/// Child-link cell text for rows inserted through the editor
pub const ADDED_LINK_PLACEHOLDER: &str = "Click me! (added)";

/// Kind of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Regular user data
    Plain,
    /// The row id column
    Identifier,
    /// Holds the id of a row in a parent table
    ForeignKey,
    /// Synthetic, navigable link to a child table
    ChildLink {
        /// The linked child table
        child: TableId,
    },
}

/// Column descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name (display label for child-link columns)
    pub name: String,
    /// Column kind
    pub kind: ColumnKind,
    /// Whether the grid lets the user edit cells of this column
    pub editable: bool,
}

impl ColumnDescriptor {
    /// Editable column of user data
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Plain,
            editable: true,
        }
    }

    /// The row id column
    #[must_use]
    pub fn identifier() -> Self {
        Self {
            name: ID_COLUMN.to_string(),
            kind: ColumnKind::Identifier,
            editable: false,
        }
    }

    /// Read-only foreign-key column
    #[must_use]
    pub fn foreign_key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::ForeignKey,
            editable: false,
        }
    }

    /// Synthetic link column labelled with the child's display name
    #[must_use]
    pub fn child_link(child: TableId, label: impl Into<String>) -> Self {
        Self {
            name: label.into(),
            kind: ColumnKind::ChildLink { child },
            editable: false,
        }
    }

    /// Id of this column in the grid namespace
    #[must_use]
    pub fn column_id(&self) -> String {
        match &self.kind {
            ColumnKind::Plain | ColumnKind::Identifier => self.name.clone(),
            ColumnKind::ForeignKey => foreign_key_column_id(&self.name),
            ColumnKind::ChildLink { child } => child_link_column_id(child),
        }
    }

    /// Check if this is a foreign-key column
    #[must_use]
    pub fn is_foreign_key(&self) -> bool {
        self.kind == ColumnKind::ForeignKey
    }

    /// Check if this is a synthetic child-link column
    #[must_use]
    pub fn is_child_link(&self) -> bool {
        matches!(self.kind, ColumnKind::ChildLink { .. })
    }

    /// Project into the shape the grid renderer consumes
    #[must_use]
    pub fn to_grid_column(&self) -> GridColumn {
        GridColumn {
            name: self.name.clone(),
            id: self.column_id(),
            editable: self.editable,
        }
    }
}

/// Grid column id of a foreign-key column
#[must_use]
pub fn foreign_key_column_id(column: &str) -> String {
    format!("{}{}", FOREIGN_KEY_PREFIX, column)
}

/// Grid column id of the link column to `child`
#[must_use]
pub fn child_link_column_id(child: &TableId) -> String {
    format!("{}{}", CHILD_LINK_PREFIX, child)
}

/// Check a user-supplied column name
///
/// # Errors
///
/// Returns a schema error for empty names and names using the reserved `!` prefix
pub fn validate_column_name(name: &str) -> GridResult<()> {
    if name.is_empty() {
        return Err(GridError::schema("column name must not be empty"));
    }
    if name.starts_with('!') {
        return Err(GridError::schema(format!(
            "column name {} uses the reserved '!' prefix",
            name
        )));
    }
    Ok(())
}

/// A column id decoded from the grid namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// The row id column
    Identifier,
    /// A plain column
    Plain(String),
    /// A foreign-key column, by name
    ForeignKey(String),
    /// A child-link column, by child table id
    ChildLink(TableId),
}

impl ColumnRef {
    /// Decode a grid column id
    #[must_use]
    pub fn parse(column_id: &str) -> Self {
        if column_id == ID_COLUMN {
            Self::Identifier
        } else if let Some(child) = column_id.strip_prefix(CHILD_LINK_PREFIX) {
            Self::ChildLink(TableId::from(child))
        } else if let Some(name) = column_id.strip_prefix(FOREIGN_KEY_PREFIX) {
            Self::ForeignKey(name.to_string())
        } else {
            Self::Plain(column_id.to_string())
        }
    }

    /// Child table targeted by a child-link column
    #[must_use]
    pub fn child_table(&self) -> Option<&TableId> {
        match self {
            Self::ChildLink(child) => Some(child),
            _ => None,
        }
    }
}

/// Column as handed to the grid renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColumn {
    /// Header label
    pub name: String,
    /// Column id in the grid namespace
    pub id: String,
    /// Whether cells are editable
    pub editable: bool,
}

//! Identifiers for RELGRID entities.
//!
//! Table ids are caller-chosen strings and double as mapping keys everywhere.
//! Row ids are unique within one table only.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Table identifier - stable key of a table in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Create a table id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row identifier - primary key of a row within its table
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    /// Create from raw value
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id following this one, `None` past `u64::MAX`
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_table_id_display() {
        let id = TableId::from("users");
        assert_eq!(id.to_string(), "users");
        assert_eq!(id.as_str(), "users");
    }

    #[test]
    fn test_table_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(TableId::from("pets"), 1);
        assert_eq!(map.get("pets"), Some(&1));
    }

    #[test]
    fn test_table_id_serialization() {
        let id = TableId::from("pets");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pets\"");
        let back: TableId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_row_id_next() {
        let id = RowId::from_raw(7);
        assert_eq!(id.next(), Some(RowId::from_raw(8)));
        assert_eq!(id.as_u64(), 7);
    }

    #[test]
    fn test_row_id_next_at_max() {
        assert_eq!(RowId::from_raw(u64::MAX).next(), None);
    }

    #[test]
    fn test_row_id_parse() {
        assert_eq!("12".parse::<RowId>().unwrap(), RowId::from_raw(12));
        assert_eq!(" 3 ".parse::<RowId>().unwrap(), RowId::from_raw(3));
        assert!("abc".parse::<RowId>().is_err());
    }

    #[test]
    fn test_row_id_ordering() {
        assert!(RowId::from_raw(1) < RowId::from_raw(2));
        assert_eq!(RowId::default(), RowId::from_raw(0));
    }
}

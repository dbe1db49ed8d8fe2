//! Server configuration.

use relgrid_core::GridError;
use relgrid_table::{EditorInput, TableRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Failure to load the session input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Input file unreadable
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Input content rejected
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Verbose logging
    pub debug: bool,
    /// Editor input file; an empty session without one
    pub input: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            debug: false,
            input: None,
        }
    }
}

impl ServerConfig {
    /// Set host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set debug logging
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set input file
    #[must_use]
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Address to bind, as `host:port`
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tables of the session: the input file's, or none
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// consistent set of tables
    pub fn load_registry(&self) -> Result<TableRegistry, InputError> {
        let Some(path) = &self.input else {
            return Ok(TableRegistry::new());
        };
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(EditorInput::from_json_str(&text)?.into_registry()?)
    }

    /// Default log filter for this configuration
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "relgrid=debug,tower_http=debug"
        } else {
            "relgrid=info,tower_http=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgrid_core::TableId;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8050");
        assert!(!config.debug);
        assert!(config.input.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = ServerConfig::default()
            .with_host("0.0.0.0")
            .with_port(9000)
            .with_debug(true)
            .with_input("tables.json");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.log_filter(), "relgrid=debug,tower_http=debug");
        assert_eq!(config.input, Some(PathBuf::from("tables.json")));
    }

    #[test]
    fn test_load_registry_without_input() {
        let registry = ServerConfig::default().load_registry().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_registry_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"root_table": "users",
                "schema": {{"users": {{}}, "pets": {{"parent_table_id": "users", "foreign_key_column": "user_id"}}}},
                "data": {{"alice": {{"pets": {{"rex": {{"species": "dog"}}}}}}}}}}"#
        )
        .unwrap();

        let config = ServerConfig::default().with_input(file.path());
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&TableId::from("pets")).unwrap().len(), 1);
    }

    #[test]
    fn test_load_registry_missing_file() {
        let config = ServerConfig::default().with_input("/nonexistent/relgrid.json");
        assert!(matches!(config.load_registry(), Err(InputError::Io { .. })));
    }
}

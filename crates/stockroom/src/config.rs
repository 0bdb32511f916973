//! Configuration for the Gateway.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! authority = "com.example.stockroom"
//! database = "inventory.db"
//! notify_capacity = 64
//!
//! [supplier]
//! email = "orders@supplier.example"
//! subject = "Inventory order request"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ansi = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Database path that opens a private in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StockroomConfig {
    /// Authority segment of every resource address.
    pub authority: String,
    /// SQLite database file, or [`MEMORY_DATABASE`].
    pub database: PathBuf,
    /// Buffered change events per observer before it is considered lagged.
    pub notify_capacity: usize,
    /// Recipient of re-order requests.
    pub supplier: SupplierConfig,
    pub logging: LoggingConfig,
}

impl Default for StockroomConfig {
    fn default() -> Self {
        Self {
            authority: "com.example.stockroom".to_owned(),
            database: PathBuf::from("inventory.db"),
            notify_capacity: 64,
            supplier: SupplierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StockroomConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Defaults with an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: PathBuf::from(MEMORY_DATABASE),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.as_os_str() == MEMORY_DATABASE
    }

    pub fn validate(&self) -> Result<()> {
        if self.authority.is_empty()
            || self.authority.contains('/')
            || self.authority.contains(char::is_whitespace)
        {
            return Err(GatewayError::Config(format!(
                "invalid authority {:?}",
                self.authority
            )));
        }
        if self.notify_capacity == 0 {
            return Err(GatewayError::Config(
                "notify_capacity must be at least 1".to_owned(),
            ));
        }
        if self.database.as_os_str().is_empty() {
            return Err(GatewayError::Config("database path is empty".to_owned()));
        }
        Ok(())
    }
}

/// Where re-order requests go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplierConfig {
    pub email: String,
    pub subject: String,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            email: "orders@example.com".to_owned(),
            subject: "Inventory order request".to_owned(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive (`info`, `stockroom=debug`, ...). `RUST_LOG` wins.
    pub level: String,
    pub format: LogFormat,
    /// Colored output (text format only).
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = StockroomConfig::from_toml_str("").unwrap();
        assert_eq!(config, StockroomConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = StockroomConfig::from_toml_str(
            r#"
            authority = "org.shop.inventory"
            database = ":memory:"
            notify_capacity = 8

            [supplier]
            email = "buyer@shop.org"

            [logging]
            level = "stockroom=debug"
            format = "json"
            ansi = false
            "#,
        )
        .unwrap();

        assert_eq!(config.authority, "org.shop.inventory");
        assert!(config.is_in_memory());
        assert_eq!(config.notify_capacity, 8);
        assert_eq!(config.supplier.email, "buyer@shop.org");
        assert_eq!(config.supplier.subject, "Inventory order request");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.ansi);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = StockroomConfig::from_toml_str("authorty = \"typo\"").unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(StockroomConfig::from_toml_str("authority = \"a/b\"").is_err());
        assert!(StockroomConfig::from_toml_str("notify_capacity = 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.toml");
        std::fs::write(&path, "database = \"shop.db\"\n").unwrap();

        let config = StockroomConfig::load(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("shop.db"));

        assert!(StockroomConfig::load(dir.path().join("missing.toml")).is_err());
    }
}

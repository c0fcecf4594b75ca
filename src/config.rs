use crate::error::{LedgerError, Result};
use crate::persistence::Backend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DATA_PATH_ENV: &str = "ROTOR_LEDGER_DATA";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub data_path: PathBuf,
    /// Show zero-stock sizes in the stock view
    pub include_zero: bool,
    pub export_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Csv,
            data_path: PathBuf::from("rotor_stock_log.csv"),
            include_zero: false,
            export_title: "rotor_stock".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LedgerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("rotor-ledger").join("config.json"))
    }

    /// Data file to use; the environment variable wins over the stored path
    pub fn resolved_data_path(&self) -> PathBuf {
        match std::env::var(DATA_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => self.data_path.clone(),
        }
    }

    pub fn set_data_path(&mut self, path: PathBuf) -> Result<()> {
        if let Some(backend) = Backend::from_path(&path) {
            self.backend = backend;
        }
        self.data_path = path;
        self.save()
    }

    pub fn set_backend(&mut self, backend: Backend) -> Result<()> {
        self.backend = backend;
        self.save()
    }

    pub fn set_include_zero(&mut self, include_zero: bool) -> Result<()> {
        self.include_zero = include_zero;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Csv);
        assert_eq!(config.data_path, PathBuf::from("rotor_stock_log.csv"));
        assert!(!config.include_zero);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"backend":"xlsx"}"#).expect("parse failed");
        assert_eq!(config.backend, Backend::Xlsx);
        assert_eq!(config.export_title, "rotor_stock");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            backend: Backend::Json,
            data_path: PathBuf::from("/tmp/ledger.json"),
            include_zero: true,
            export_title: "march".into(),
        };

        let json = serde_json::to_string(&config).expect("serialize failed");
        let restored: Config = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(restored.backend, Backend::Json);
        assert_eq!(restored.data_path, config.data_path);
        assert!(restored.include_zero);
    }
}

//! Persisted user configuration for the admin shell.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::utils::{ensure_dir, PathResolver};

const TMP_SUFFIX: &str = "tmp";
const DATA_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Unknown configuration key `{0}`")]
    UnknownKey(String),

    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the ledger file and its backups. Defaults to `<app dir>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_ledger_file")]
    pub ledger_file: String,
    /// Prefilled rate for `month-new` when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_exchange_rate: Option<Decimal>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            ledger_file: Self::default_ledger_file(),
            default_exchange_rate: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "data_dir",
        "ledger_file",
        "default_exchange_rate",
        "ui_color_enabled",
        "backup_retention",
    ];

    pub fn default_ledger_file() -> String {
        "ledger.json".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| base.join(DATA_DIR))
    }

    pub fn ledger_path(&self, base: &Path) -> PathBuf {
        self.resolve_data_dir(base).join(&self.ledger_file)
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "ledger_file" => self.ledger_file.clone(),
            "default_exchange_rate" => self
                .default_exchange_rate
                .map(|rate| rate.normalize().to_string())
                .unwrap_or_else(|| "(unset)".into()),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "backup_retention" => self.backup_retention.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Applies a textual value; `unset` clears optional keys.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let value = raw.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "data_dir" => {
                self.data_dir = (value != "unset").then(|| PathBuf::from(value));
            }
            "ledger_file" => {
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(invalid("expected a plain file name"));
                }
                self.ledger_file = value.to_string();
            }
            "default_exchange_rate" => {
                if value == "unset" {
                    self.default_exchange_rate = None;
                } else {
                    let rate = value
                        .parse::<Decimal>()
                        .map_err(|_| invalid("expected a decimal number"))?;
                    if rate <= Decimal::ZERO {
                        return Err(invalid("must be greater than zero"));
                    }
                    self.default_exchange_rate = Some(rate);
                }
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
            "backup_retention" => {
                let retention = value
                    .parse::<usize>()
                    .map_err(|_| invalid("expected a positive integer"))?;
                if retention == 0 {
                    return Err(invalid("must be at least 1"));
                }
                self.backup_retention = retention;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] under `<app dir>/config/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            config_path: PathResolver::config_file_in(&base),
            base_dir: base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = self.config_path.with_extension(format!("json.{TMP_SUFFIX}"));
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

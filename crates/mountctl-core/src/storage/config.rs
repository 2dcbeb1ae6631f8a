//! Configuration management
//!
//! Where the application's database lives, which table holds the storages,
//! and the base URL of its admin API.
//! Priority: CLI argument > MOUNTCTL_* environment variable > config.toml >
//! a database found in the working directory > default

use super::Result;
use crate::error::ConfigError;
use crate::store::DEFAULT_TABLE;
use crate::utils::input::EnvConfigReader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Database locations tried, relative to the working directory, when
/// nothing else names one. The application keeps its database under `data/`.
pub const DATABASE_CANDIDATES: &[&str] = &["data/data.db", "data.db"];

/// Base URL of a default local installation
pub const DEFAULT_API_URL: &str = "http://localhost:5244";

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Path to the application's SQLite database (usually `data/data.db`)
    pub database_path: Option<String>,
    /// Storage table name, when the installation uses a non-default prefix
    pub table: Option<String>,
    /// Base URL of the application's HTTP API
    pub api_url: Option<String>,
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database_path: Option<String>,
    pub table: Option<String>,
    pub api_url: Option<String>,
}

impl Overrides {
    /// Overrides taken from the MOUNTCTL_* environment variables
    pub fn from_env() -> Self {
        Self {
            database_path: EnvConfigReader::read_db_path(),
            table: EnvConfigReader::read_table(),
            api_url: EnvConfigReader::read_url(),
        }
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: Option<PathBuf>,
    pub table: String,
    pub api_url: String,
}

impl Settings {
    /// Fill in the database path from [`DATABASE_CANDIDATES`] under `base`
    /// when none was configured
    pub fn discover_database(&mut self, base: &Path) {
        if self.database_path.is_none() {
            self.database_path = discover_database_path(base);
        }
    }

    pub fn require_database_path(&self) -> std::result::Result<&PathBuf, ConfigError> {
        self.database_path
            .as_ref()
            .ok_or(ConfigError::MissingDatabasePath)
    }
}

/// First candidate under `base` that is an existing file
pub fn discover_database_path(base: &Path) -> Option<PathBuf> {
    let found = DATABASE_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_file());
    match &found {
        Some(path) => log::debug!("found database at {}", path.display()),
        None => log::debug!("no database under {}", base.display()),
    }
    found
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            message: format!("Failed to parse config file: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| ConfigError::Parse {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| ConfigError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("mountctl").join("config.toml"))
    }

    /// Combine CLI arguments, environment and this file into final settings
    pub fn resolve(&self, cli: &Overrides, env: &Overrides) -> Settings {
        let pick = |cli: &Option<String>, env: &Option<String>, file: &Option<String>| {
            cli.clone()
                .filter(|s| !s.is_empty())
                .or_else(|| env.clone())
                .or_else(|| file.clone().filter(|s| !s.is_empty()))
        };

        Settings {
            database_path: pick(&cli.database_path, &env.database_path, &self.database_path)
                .map(PathBuf::from),
            table: pick(&cli.table, &env.table, &self.table)
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            api_url: pick(&cli.api_url, &env.api_url, &self.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    pub fn set_database_path(&mut self, path: String) {
        self.database_path = Some(path);
    }

    pub fn set_table(&mut self, table: String) {
        self.table = Some(table);
    }

    pub fn set_api_url(&mut self, url: String) {
        self.api_url = Some(url);
    }
}

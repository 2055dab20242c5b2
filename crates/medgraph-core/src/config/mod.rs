//! Configuration management for medgraph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Command-line flags (highest priority, see [`Config::apply_overrides`])
//! 2. Environment variables (`MEDGRAPH_*`)
//! 3. A JSON config file: an explicit path, else `./medgraph.json`,
//!    else `~/.config/medgraph/config.json`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Missing database connection setting '{0}'. Set it in the config file or pass --{0}.")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
///
/// Keys are flat so the file matches a plain connection bundle:
///
/// ```json
/// { "endpoint": "bolt://localhost:7687", "username": "neo4j", "password": "secret", "database": "neo4j" }
/// ```
///
/// `website`, `user` and `dbname` are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph database endpoint URL.
    #[serde(alias = "website")]
    pub endpoint: Option<String>,

    /// Database user.
    #[serde(alias = "user")]
    pub username: Option<String>,

    /// Database password.
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Database name.
    #[serde(alias = "dbname")]
    pub database: String,

    /// Namespace (SurrealDB only).
    pub namespace: String,

    /// Input record file.
    pub input: PathBuf,

    /// Rows per submitted batch.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            input: PathBuf::from(DEFAULT_INPUT),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

/// Validated connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub namespace: String,
}

/// Read an environment variable; unset is `None`, non-unicode is an error.
fn env_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => {
            Err(ConfigError::Invalid(format!("{} is not valid unicode", name)))
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Otherwise searches:
    /// 1. `./medgraph.json` (project local)
    /// 2. `~/.config/medgraph/config.json` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_locations().into_iter().find(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    tracing::warn!(
                        "no {} found, relying on environment and command-line settings",
                        DEFAULT_CONFIG_FILE
                    );
                    Self::default()
                }
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
        }
        locations
    }

    /// Apply environment variable overrides.
    ///
    /// A set but unusable variable is an error rather than silently ignored.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(endpoint) = env_var(ENV_ENDPOINT)? {
            self.endpoint = Some(endpoint);
        }
        if let Some(user) = env_var(ENV_USER)? {
            self.username = Some(user);
        }
        if let Some(password) = env_var(ENV_PASSWORD)? {
            self.password = Some(password);
        }
        if let Some(database) = env_var(ENV_DATABASE)? {
            self.database = database;
        }
        if let Some(input) = env_var(ENV_INPUT)? {
            self.input = PathBuf::from(input);
        }
        if let Some(size) = env_var(ENV_BATCH_SIZE)? {
            self.batch_size = size.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a whole number, got '{}'", ENV_BATCH_SIZE, size))
            })?;
        }
        Ok(())
    }

    /// Apply command-line overrides; they win over every other source.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(username) = overrides.username {
            self.username = Some(username);
        }
        if let Some(password) = overrides.password {
            self.password = Some(password);
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
    }

    /// Builder-style variant of [`Self::apply_overrides`].
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.apply_overrides(overrides);
        self
    }

    /// Validated connection settings.
    ///
    /// Endpoint, username and password are required; blank values count as missing.
    pub fn connection(&self) -> Result<ConnectionSettings, ConfigError> {
        fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ConfigError::Missing(name))
        }

        Ok(ConnectionSettings {
            endpoint: required(&self.endpoint, "endpoint")?,
            username: required(&self.username, "username")?,
            password: required(&self.password, "password")?,
            database: self.database.clone(),
            namespace: self.namespace.clone(),
        })
    }

    /// Validated batch width.
    pub fn batch_width(&self) -> Result<usize, ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
        }
        Ok(self.batch_size)
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

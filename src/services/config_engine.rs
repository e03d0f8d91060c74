// marcador Config Engine
// Loads and saves `MarcadorConfig` as JSON and layers environment and
// command-line overrides on top of it.
//
// Precedence: command-line flag > environment > config file > default.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::config::MarcadorConfig;
use crate::types::errors::ConfigError;

/// Store file used by the CLI when no backend is configured.
pub const ENV_DB: &str = "MARCADOR_DB";
/// Server address (`host:port`) used by the CLI.
pub const ENV_HOST: &str = "MARCADOR_HOST";
/// Directory holding the default store file.
pub const ENV_DATA_DIR: &str = "MARCADOR_DATA_DIR";

/// Trait defining the config engine interface.
pub trait ConfigEngineTrait {
    fn load(&mut self) -> Result<MarcadorConfig, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn get_config(&self) -> &MarcadorConfig;
    fn get_config_path(&self) -> &Path;
}

/// Config engine that persists `MarcadorConfig` as a JSON file.
pub struct ConfigEngine {
    config_path: PathBuf,
    config: MarcadorConfig,
}

impl ConfigEngine {
    /// Creates a new ConfigEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `config.json` in the platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self {
            config_path: path_override.unwrap_or_else(platform::default_config_path),
            config: MarcadorConfig::default(),
        }
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.is_empty()) {
            self.config.db = Some(db);
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
            self.config.host = Some(host);
        }
        if self.config.server.db.is_none() {
            if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
                self.config.server.db = Some(
                    PathBuf::from(dir)
                        .join(platform::DB_FILE_NAME)
                        .to_string_lossy()
                        .to_string(),
                );
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies the CLI's `--db` / `--host` flags; `None` leaves the value untouched.
    pub fn apply_client_flags(&mut self, db: Option<String>, host: Option<String>) {
        if db.is_some() {
            self.config.db = db;
        }
        if host.is_some() {
            self.config.host = host;
        }
    }

    /// Applies the server's `--db` / `--host` / `--port` flags.
    pub fn apply_server_flags(&mut self, db: Option<String>, host: Option<String>, port: Option<u16>) {
        if db.is_some() {
            self.config.server.db = db;
        }
        if let Some(host) = host {
            self.config.server.host = host;
        }
        if let Some(port) = port {
            self.config.server.port = port;
        }
    }

    /// Store file the server serves: its own `db`, then the client `db`, then the default.
    pub fn server_db_path(&self) -> PathBuf {
        self.config
            .server
            .db
            .as_ref()
            .or(self.config.db.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(platform::default_db_path)
    }
}

impl ConfigEngineTrait for ConfigEngine {
    /// Loads the config file.
    ///
    /// If the file does not exist, returns the defaults.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<MarcadorConfig, ConfigError> {
        if !self.config_path.exists() {
            self.config = MarcadorConfig::default();
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        self.config = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        log::debug!("Loaded config from {}", self.config_path.display());
        Ok(self.config.clone())
    }

    /// Writes the current config, creating parent directories as needed.
    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&self.config_path, json)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_config(&self) -> &MarcadorConfig {
        &self.config
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

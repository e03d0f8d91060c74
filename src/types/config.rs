use serde::{Deserialize, Serialize};

/// Default UDP port of the bookmark server.
pub const DEFAULT_PORT: u16 = 6003;

/// Default bind address of the bookmark server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default client receive timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Top-level configuration container, stored as `config.json`.
///
/// `db` and `host` select the backend for the CLI: a local store file or a
/// remote server address (`host:port`). When both are set, `db` wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarcadorConfig {
    pub db: Option<String>,
    pub host: Option<String>,
    pub timeout_ms: u64,
    pub server: ServerConfig,
}

impl Default for MarcadorConfig {
    fn default() -> Self {
        Self {
            db: None,
            host: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            server: ServerConfig::default(),
        }
    }
}

/// Settings for the `marcador-server` process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub db: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` pair the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

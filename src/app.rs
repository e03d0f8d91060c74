//! App core for marcador.
//!
//! Resolves the configuration and opens the backend the CLI talks to: a
//! local store file or a remote bookmark server.

use std::path::PathBuf;
use std::time::Duration;

use crate::proxy::{BookmarkProxy, LocalProxy, RemoteProxy};
use crate::services::config_engine::{ConfigEngine, ConfigEngineTrait};
use crate::types::config::MarcadorConfig;
use crate::types::errors::BookmarkError;

/// The store a command runs against.
pub enum Backend {
    Local(LocalProxy),
    Remote(RemoteProxy),
}

impl Backend {
    pub fn proxy(&self) -> &dyn BookmarkProxy {
        match self {
            Backend::Local(proxy) => proxy,
            Backend::Remote(proxy) => proxy,
        }
    }
}

/// Central struct holding the resolved configuration and the open backend.
pub struct App {
    pub config: MarcadorConfig,
    pub backend: Backend,
}

impl App {
    /// Opens the backend selected by `engine`'s configuration.
    ///
    /// A configured `db` wins over `host`; with neither, the default store
    /// file in the platform data directory is used.
    pub fn new(engine: &ConfigEngine) -> Result<Self, BookmarkError> {
        let config = engine.get_config().clone();
        let backend = match (&config.db, &config.host) {
            (Some(db), _) => Backend::Local(LocalProxy::open(PathBuf::from(db))?),
            (None, Some(host)) => Backend::Remote(
                RemoteProxy::connect(host.as_str())?
                    .with_timeout(Duration::from_millis(config.timeout_ms))?,
            ),
            (None, None) => Backend::Local(LocalProxy::open(engine.server_db_path())?),
        };
        Ok(Self { config, backend })
    }

    pub fn proxy(&self) -> &dyn BookmarkProxy {
        self.backend.proxy()
    }
}

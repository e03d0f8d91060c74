// marcador platform abstraction
// Selects the per-OS config and data directories at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as imp;

#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
use windows as imp;

/// File name of the bookmark store inside the data directory.
pub const DB_FILE_NAME: &str = "marcador.sqlite";

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the platform-specific configuration directory for marcador.
///
/// - **Linux**: `~/.config/marcador` (or `$XDG_CONFIG_HOME/marcador`)
/// - **macOS**: `~/Library/Application Support/marcador`
/// - **Windows**: `%APPDATA%/marcador`
pub fn get_config_dir() -> PathBuf {
    imp::get_config_dir()
}

/// Returns the platform-specific data directory for marcador.
///
/// - **Linux**: `~/.local/share/marcador` (or `$XDG_DATA_HOME/marcador`)
/// - **macOS**: `~/Library/Application Support/marcador`
/// - **Windows**: `%APPDATA%/marcador`
pub fn get_data_dir() -> PathBuf {
    imp::get_data_dir()
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE_NAME)
}

/// Default location of the bookmark store.
pub fn default_db_path() -> PathBuf {
    get_data_dir().join(DB_FILE_NAME)
}

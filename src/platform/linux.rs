// marcador platform paths for Linux
// Config: $XDG_CONFIG_HOME/marcador or ~/.config/marcador
// Data:   $XDG_DATA_HOME/marcador   or ~/.local/share/marcador

use std::env;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "marcador";

/// Resolves an XDG base directory: the variable if set and absolute, else `$HOME/<fallback>`.
fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    match xdg.filter(|dir| Path::new(dir).is_absolute()) {
        Some(dir) => PathBuf::from(dir).join(APP_DIR),
        None => {
            let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
            for part in fallback {
                path.push(part);
            }
            path.join(APP_DIR)
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_CONFIG_HOME").ok(),
        env::var("HOME").ok(),
        &[".config"],
    )
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_DATA_HOME").ok(),
        env::var("HOME").ok(),
        &[".local", "share"],
    )
}

use std::fmt;

// === BookmarkError ===

/// Errors raised by the bookmark store, the access proxies and the wire protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkError {
    /// No bookmark with the given url or id.
    NotFound(String),
    /// The url is already used by a different bookmark.
    Conflict(String),
    /// Request arguments are missing or malformed.
    Validation(String),
    /// The SQLite layer failed.
    Storage(String),
    /// The request or response envelope could not be understood.
    Protocol(String),
    /// The remote server answered with an error response.
    Remote(String),
    /// The socket failed or the server did not answer in time.
    Transport(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(what) => write!(f, "Bookmark not found: {}", what),
            BookmarkError::Conflict(url) => write!(f, "Bookmark url already in use: {}", url),
            BookmarkError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            BookmarkError::Storage(msg) => write!(f, "Bookmark database error: {}", msg),
            BookmarkError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            BookmarkError::Remote(msg) => write!(f, "Server error: {}", msg),
            BookmarkError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<rusqlite::Error> for BookmarkError {
    fn from(err: rusqlite::Error) -> Self {
        BookmarkError::Storage(err.to_string())
    }
}

// === ConfigError ===

/// Errors related to loading or saving the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the config file.
    IoError(String),
    /// The config file is not valid JSON for `MarcadorConfig`.
    SerializationError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::SerializationError(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

use marcador::types::errors::*;

// === BookmarkError Tests ===

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::NotFound("a.com".to_string()).to_string(),
        "Bookmark not found: a.com"
    );
    assert_eq!(
        BookmarkError::Conflict("b.com".to_string()).to_string(),
        "Bookmark url already in use: b.com"
    );
    assert_eq!(
        BookmarkError::Validation("missing fields: url".to_string()).to_string(),
        "Invalid request: missing fields: url"
    );
    assert_eq!(
        BookmarkError::Storage("disk I/O error".to_string()).to_string(),
        "Bookmark database error: disk I/O error"
    );
    assert_eq!(
        BookmarkError::Protocol("unknown command: x".to_string()).to_string(),
        "Protocol error: unknown command: x"
    );
    assert_eq!(
        BookmarkError::Remote("Bookmark not found: c.com".to_string()).to_string(),
        "Server error: Bookmark not found: c.com"
    );
    assert_eq!(
        BookmarkError::Transport("timed out".to_string()).to_string(),
        "Transport error: timed out"
    );
}

#[test]
fn bookmark_error_from_rusqlite_is_storage() {
    let err: BookmarkError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, BookmarkError::Storage(_)));
}

#[test]
fn bookmark_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(BookmarkError::NotFound("x".to_string()));
    assert!(err.source().is_none());
}

// === ConfigError Tests ===

#[test]
fn config_error_display_variants() {
    assert_eq!(
        ConfigError::IoError("permission denied".to_string()).to_string(),
        "Config I/O error: permission denied"
    );
    assert_eq!(
        ConfigError::SerializationError("expected value".to_string()).to_string(),
        "Config serialization error: expected value"
    );
}

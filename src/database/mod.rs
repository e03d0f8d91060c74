//! marcador database layer.
//!
//! Provides SQLite connection management and schema migrations.
//!
//! # Usage
//!
//! ```no_run
//! use marcador::database::Database;
//!
//! // Open a persistent store
//! let db = Database::open("marcador.sqlite").expect("failed to open database");
//!
//! // Or use an in-memory store for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! // Access the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;

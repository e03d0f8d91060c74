//! marcador: a personal bookmark manager.
//!
//! Bookmarks with free-form tags live in a SQLite store, are ranked by a
//! visit-driven decay score, and can be served to remote clients over a
//! small JSON-over-UDP protocol.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod proxy;
pub mod rpc_handler;
pub mod rpc_listener;
pub mod rpc_protocol;
pub mod services;
pub mod types;

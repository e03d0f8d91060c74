// marcador state managers
// Managers own the stateful operations on the SQLite store.

pub mod bookmark_manager;

//! MarkWarden database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! persisted validity and aggregate detection caches.

pub mod connection;
pub mod migrations;

pub use connection::Database;

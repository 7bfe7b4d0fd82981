//! MarkWarden — bookmark categorization and data-quality detection engine.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod database;
pub mod detectors;
pub mod managers;
pub mod services;
pub mod types;

// MarkWarden shared type definitions
// Each submodule defines types used across the engine.

pub mod bookmark;
pub mod category;
pub mod detection;
pub mod errors;

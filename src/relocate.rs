//! Planning and execution of renames.
//!
//! A run has two passes. [`Engine::plan`] reads and normalizes every file,
//! groups them into albums, filters and classifies each album, renders the
//! destination and checks for collisions, without touching the filesystem.
//! [`Engine::run`] then hands every planned relocation to an [`Executor`]:
//! `FileSystem` performs it, `DryRun` only reports it. Both modes share the
//! whole planning pass, so a dry run predicts the real one exactly.

mod engine;
mod execute;
mod fsops;
mod types;

pub use engine::Engine;
pub use execute::{Executor, executor_for};
pub use types::*;

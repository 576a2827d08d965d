//! Error types shared by the relocation pipeline.
//!
//! Errors scoped to a single file (`FileRead`, `DestinationCollision`,
//! `DirectoryCreate`, `Write`, `Io`, `RemoveSource`) are recorded against that file
//! and the run continues. Template errors are configuration errors and abort
//! the run before any file is touched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The tag reader could not open or parse the file.
    #[error("failed to read tags from {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    /// Malformed format string or unknown template function.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Something already occupies the destination.
    #[error("destination already exists: {0}")]
    DestinationCollision(PathBuf),

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or inspecting a file failed outside of tag parsing.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination was written but the source could not be removed.
    #[error("copied to destination but failed to remove source {path}: {source}")]
    RemoveSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

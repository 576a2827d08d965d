//! Plan entries, skip reasons and per-file results.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Remove the source once the destination is complete.
    Move,
    /// Leave the source in place.
    Copy,
}

/// Why a file is not relocated. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension not in the allow-list; tags were never read.
    ExtensionNotAllowed,
    /// Album has fewer files than the configured minimum.
    BelowMinimum { files: usize, minimum: usize },
    /// Album file count differs from its declared track total.
    IncompleteAlbum {
        files: usize,
        expected: Option<usize>,
    },
    /// The configured `skip_if_empty` field is empty.
    EmptyField(String),
    /// The template rendered to an empty path.
    EmptyPath,
    /// The destination already holds this file or an identical copy.
    AlreadyInPlace,
    /// The destination is taken by a different file, or by an earlier file of
    /// the same run.
    DestinationCollision,
}

impl SkipReason {
    /// Stable, machine-friendly reason code.
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::ExtensionNotAllowed => "extension-not-allowed",
            SkipReason::BelowMinimum { .. } => "below-minimum",
            SkipReason::IncompleteAlbum { .. } => "incomplete-album",
            SkipReason::EmptyField(_) => "empty-field",
            SkipReason::EmptyPath => "empty-path",
            SkipReason::AlreadyInPlace => "already-in-place",
            SkipReason::DestinationCollision => "destination-collision",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BelowMinimum { files, minimum } => {
                write!(f, "{} ({files} of at least {minimum} files)", self.code())
            }
            SkipReason::IncompleteAlbum {
                files,
                expected: Some(expected),
            } => write!(f, "{} ({files} of {expected} tracks)", self.code()),
            SkipReason::IncompleteAlbum {
                files,
                expected: None,
            } => write!(f, "{} ({files} files, track total unknown)", self.code()),
            SkipReason::EmptyField(field) => write!(f, "{} (${field})", self.code()),
            other => f.write_str(other.code()),
        }
    }
}

/// A file that passed every gate and has a free destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: Mode,
}

/// One entry of a rename plan.
#[derive(Debug)]
pub enum PlanEntry {
    Relocate(Relocation),
    Skip {
        source: PathBuf,
        destination: Option<PathBuf>,
        reason: SkipReason,
    },
    Fail {
        source: PathBuf,
        error: Error,
    },
}

impl PlanEntry {
    pub fn source(&self) -> &Path {
        match self {
            PlanEntry::Relocate(r) => &r.source,
            PlanEntry::Skip { source, .. } | PlanEntry::Fail { source, .. } => source,
        }
    }

    pub fn destination(&self) -> Option<&Path> {
        match self {
            PlanEntry::Relocate(r) => Some(&r.destination),
            PlanEntry::Skip { destination, .. } => destination.as_deref(),
            PlanEntry::Fail { .. } => None,
        }
    }
}

/// What finally happened to a file.
#[derive(Debug)]
pub enum Outcome {
    Moved,
    /// Source and destination live on different devices: the file was copied
    /// and the source removed afterwards.
    MovedAcrossDevices,
    Copied,
    /// Dry run: the relocation that would have happened.
    Previewed(Mode),
    Skipped(SkipReason),
    Failed(Error),
}

impl Outcome {
    /// Short label for reports.
    pub fn action(&self) -> &'static str {
        match self {
            Outcome::Moved => "Rename",
            Outcome::MovedAcrossDevices => "Move",
            Outcome::Copied => "Copy",
            Outcome::Previewed(_) => "Dry run",
            Outcome::Skipped(SkipReason::AlreadyInPlace) => "Renamed",
            Outcome::Skipped(SkipReason::DestinationCollision) => "Exists",
            Outcome::Skipped(_) => "Skip",
            Outcome::Failed(_) => "Error",
        }
    }
}

/// Result for one processed file, ready for reporting.
#[derive(Debug)]
pub struct RenameRecord {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub outcome: Outcome,
}

impl RenameRecord {
    /// Human readable reason for skips and failures.
    pub fn reason(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Skipped(reason) => Some(reason.to_string()),
            Outcome::Failed(error) => Some(error.to_string()),
            _ => None,
        }
    }
}

use crate::config::RenameSettings;

use super::fsops;
use super::types::{Mode, Outcome, Relocation};

/// The point where dry runs and real runs part ways. Everything before it is
/// shared planning.
pub trait Executor {
    fn execute(&self, relocation: &Relocation) -> Outcome;
}

/// Reports planned relocations without touching the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl Executor for DryRun {
    fn execute(&self, relocation: &Relocation) -> Outcome {
        Outcome::Previewed(relocation.mode)
    }
}

/// Performs relocations on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl Executor for FileSystem {
    fn execute(&self, relocation: &Relocation) -> Outcome {
        let Relocation {
            source,
            destination,
            mode,
        } = relocation;
        let result = match mode {
            Mode::Copy => fsops::copy_file(source, destination).map(|()| Outcome::Copied),
            Mode::Move => fsops::move_file(source, destination).map(|across| {
                if across {
                    Outcome::MovedAcrossDevices
                } else {
                    Outcome::Moved
                }
            }),
        };
        result.unwrap_or_else(Outcome::Failed)
    }
}

/// Pick the executor for the configured mode.
pub fn executor_for(settings: &RenameSettings) -> Box<dyn Executor> {
    if settings.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(FileSystem)
    }
}

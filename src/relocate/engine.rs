use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::album::{AlbumFilter, group_by_directory, is_compilation};
use crate::config::Settings;
use crate::error::Error;
use crate::library::has_allowed_extension;
use crate::meta::{FieldStore, TagReader, normalize};
use crate::template::{FunctionLibrary, PathFormat, TemplateError};

use super::execute::Executor;
use super::fsops::{self, Existing};
use super::types::{Mode, Outcome, PlanEntry, Relocation, RenameRecord, SkipReason};

/// A file whose tags were read and normalized.
struct Candidate {
    index: usize,
    source: PathBuf,
    fields: FieldStore,
}

/// Computes rename plans and carries them out.
pub struct Engine<'a> {
    settings: &'a Settings,
    reader: &'a dyn TagReader,
    library: &'a dyn FunctionLibrary,
    format: PathFormat,
    compilation_format: PathFormat,
    filter: AlbumFilter,
    working_dir: PathBuf,
}

impl<'a> Engine<'a> {
    /// Compile both format strings up front; a bad template is reported here,
    /// before any file is read.
    ///
    /// Relative source and target paths are resolved against `working_dir`,
    /// which is also the default target directory.
    pub fn new(
        settings: &'a Settings,
        reader: &'a dyn TagReader,
        library: &'a dyn FunctionLibrary,
        working_dir: PathBuf,
    ) -> Result<Self, TemplateError> {
        let format = PathFormat::compile(&settings.rename.format, library)?;
        let compilation_format = PathFormat::compile(&settings.rename.compilation_format, library)?;
        debug!("format: {}", format.source());
        debug!("compilation format: {}", compilation_format.source());
        Ok(Self {
            settings,
            reader,
            library,
            format,
            compilation_format,
            filter: AlbumFilter::from(&settings.filter),
            working_dir,
        })
    }

    fn mode(&self) -> Mode {
        if self.settings.rename.copy {
            Mode::Copy
        } else {
            Mode::Move
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    fn target_root(&self, source: &Path) -> PathBuf {
        if self.settings.rename.source_as_target_dir {
            source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.working_dir.clone())
        } else if let Some(target) = &self.settings.rename.target_dir {
            self.absolute(target)
        } else {
            self.working_dir.clone()
        }
    }

    /// Target root + relative path + the source's extension, verbatim.
    fn destination(&self, source: &Path, relative: &str) -> PathBuf {
        let mut name = OsString::from(relative);
        if let Some(ext) = source.extension() {
            name.push(".");
            name.push(ext);
        }
        self.target_root(source).join(name)
    }

    /// Build the plan for `files` without modifying anything on disk.
    ///
    /// Entries come back in the order of `files`. Only template errors abort
    /// planning; every per-file problem becomes a `Skip` or `Fail` entry.
    pub fn plan(&self, files: &[PathBuf]) -> Result<Vec<PlanEntry>, TemplateError> {
        let shell_friendly = self.settings.rename.shell_friendly;
        let mut entries: Vec<Option<PlanEntry>> = files.iter().map(|_| None).collect();
        let mut candidates: Vec<Candidate> = Vec::new();

        for (index, path) in files.iter().enumerate() {
            let source = self.absolute(path);
            if !has_allowed_extension(&source, &self.settings.library.extensions) {
                entries[index] = Some(PlanEntry::Skip {
                    source,
                    destination: None,
                    reason: SkipReason::ExtensionNotAllowed,
                });
                continue;
            }
            match self.reader.read_tags(&source) {
                Ok(mut fields) => {
                    normalize(&mut fields, shell_friendly);
                    if tracing::enabled!(tracing::Level::TRACE) {
                        let set: Vec<String> = fields
                            .iter()
                            .filter(|(_, v)| !v.is_empty())
                            .map(|(k, v)| format!("{k}={v}"))
                            .collect();
                        tracing::trace!("{}: {}", source.display(), set.join(", "));
                    }
                    candidates.push(Candidate {
                        index,
                        source,
                        fields,
                    });
                }
                Err(error) => {
                    warn!("{error}");
                    entries[index] = Some(PlanEntry::Fail { source, error });
                }
            }
        }

        let sources: Vec<&Path> = candidates.iter().map(|c| c.source.as_path()).collect();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for group in group_by_directory(&sources) {
            let members: Vec<&FieldStore> = group
                .members
                .iter()
                .map(|&i| &candidates[i].fields)
                .collect();

            if let Some(reason) = self.filter.check(&members) {
                debug!("{}: {reason}", group.directory.display());
                for &i in &group.members {
                    let candidate = &candidates[i];
                    entries[candidate.index] = Some(PlanEntry::Skip {
                        source: candidate.source.clone(),
                        destination: None,
                        reason: reason.clone(),
                    });
                }
                continue;
            }

            let compilation = is_compilation(members.iter().copied());
            debug!(
                "{}: {} file(s), {}",
                group.directory.display(),
                members.len(),
                if compilation { "compilation" } else { "album" }
            );
            let format = if compilation {
                &self.compilation_format
            } else {
                &self.format
            };

            for &i in &group.members {
                let candidate = &candidates[i];
                entries[candidate.index] = Some(self.resolve(candidate, format, &mut claimed)?);
            }
        }

        Ok(entries.into_iter().flatten().collect())
    }

    fn resolve(
        &self,
        candidate: &Candidate,
        format: &PathFormat,
        claimed: &mut HashSet<PathBuf>,
    ) -> Result<PlanEntry, TemplateError> {
        let source = candidate.source.clone();
        let skip = |destination: Option<PathBuf>, reason: SkipReason| PlanEntry::Skip {
            source: candidate.source.clone(),
            destination,
            reason,
        };

        if let Some(field) = &self.settings.rename.skip_if_empty {
            if !candidate.fields.is_set(field) {
                return Ok(skip(None, SkipReason::EmptyField(field.clone())));
            }
        }

        let relative = format.render(
            &candidate.fields,
            self.library,
            self.settings.rename.shell_friendly,
        )?;
        if relative.is_empty() {
            return Ok(skip(None, SkipReason::EmptyPath));
        }

        let destination = self.destination(&source, &relative);
        if !claimed.insert(destination.clone()) {
            return Ok(skip(Some(destination), SkipReason::DestinationCollision));
        }

        let entry = match fsops::inspect(&source, &destination) {
            Ok(Existing::Free) => PlanEntry::Relocate(Relocation {
                source,
                destination,
                mode: self.mode(),
            }),
            Ok(Existing::SameFile | Existing::Identical) => {
                skip(Some(destination), SkipReason::AlreadyInPlace)
            }
            Ok(Existing::Different) => skip(Some(destination), SkipReason::DestinationCollision),
            Err(e) => PlanEntry::Fail {
                source,
                error: Error::Io {
                    path: destination,
                    source: e,
                },
            },
        };
        Ok(entry)
    }

    /// Plan `files`, then execute every relocation through `executor`.
    ///
    /// `stop` is checked between files; once set, the remaining files are
    /// left untouched and omitted from the result.
    pub fn run(
        &self,
        files: &[PathBuf],
        executor: &dyn Executor,
        stop: &AtomicBool,
    ) -> Result<Vec<RenameRecord>, TemplateError> {
        let plan = self.plan(files)?;
        let total = plan.len();
        let mut records = Vec::with_capacity(total);

        for (done, entry) in plan.into_iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                warn!("interrupted, {} file(s) left untouched", total - done);
                break;
            }
            debug!(
                source = %entry.source().display(),
                destination = ?entry.destination(),
                "processing"
            );
            let record = match entry {
                PlanEntry::Relocate(relocation) => {
                    let outcome = executor.execute(&relocation);
                    if let Outcome::Failed(error) = &outcome {
                        warn!("{}: {error}", relocation.source.display());
                    }
                    RenameRecord {
                        source: relocation.source,
                        destination: Some(relocation.destination),
                        outcome,
                    }
                }
                PlanEntry::Skip {
                    source,
                    destination,
                    reason,
                } => RenameRecord {
                    source,
                    destination,
                    outcome: Outcome::Skipped(reason),
                },
                PlanEntry::Fail { source, error } => RenameRecord {
                    source,
                    destination: None,
                    outcome: Outcome::Failed(error),
                },
            };
            records.push(record);
        }

        Ok(records)
    }
}

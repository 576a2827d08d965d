//! Filesystem primitives used by the real executor.
//!
//! Nothing here overwrites an existing file. Copies are written to a
//! temporary file next to the destination and renamed into place, so an
//! interrupted or failed copy never leaves a partial destination behind.

use std::fs::{self, File, Metadata};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// State of a destination path relative to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existing {
    Free,
    /// The destination is the source itself.
    SameFile,
    /// A different file with byte-identical content.
    Identical,
    Different,
}

pub fn inspect(source: &Path, destination: &Path) -> io::Result<Existing> {
    let dest_meta = match fs::symlink_metadata(destination) {
        Ok(m) => m,
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) =>
        {
            return Ok(Existing::Free);
        }
        Err(e) => return Err(e),
    };
    let src_meta = fs::metadata(source)?;

    if same_file(&src_meta, &dest_meta, source, destination) {
        return Ok(Existing::SameFile);
    }
    let dest_meta = fs::metadata(destination)?;
    if dest_meta.is_file()
        && dest_meta.len() == src_meta.len()
        && same_content(source, destination)?
    {
        return Ok(Existing::Identical);
    }
    Ok(Existing::Different)
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata, _: &Path, _: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_: &Metadata, _: &Metadata, a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    let mut a = BufReader::with_capacity(64 * 1024, File::open(a)?);
    let mut b = BufReader::with_capacity(64 * 1024, File::open(b)?);
    loop {
        let (chunk_a, chunk_b) = (a.fill_buf()?, b.fill_buf()?);
        if chunk_a.is_empty() || chunk_b.is_empty() {
            return Ok(chunk_a.is_empty() && chunk_b.is_empty());
        }
        let n = chunk_a.len().min(chunk_b.len());
        if chunk_a[..n] != chunk_b[..n] {
            return Ok(false);
        }
        a.consume(n);
        b.consume(n);
    }
}

/// Create the destination's parent directories; returns the parent.
fn ensure_parent(destination: &Path) -> Result<PathBuf> {
    let parent = destination
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&parent).map_err(|source| Error::DirectoryCreate {
        path: parent.clone(),
        source,
    })?;
    Ok(parent)
}

/// Copy `source` to a destination that must not exist yet.
pub fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    let parent = ensure_parent(destination)?;
    let write_err = |source: io::Error| Error::Write {
        path: destination.to_path_buf(),
        source,
    };
    let read_err = |e: io::Error| Error::Io {
        path: source.to_path_buf(),
        source: e,
    };

    let mut input = File::open(source).map_err(read_err)?;
    let input_meta = input.metadata().map_err(read_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".audiorename-")
        .suffix(".part")
        .tempfile_in(&parent)
        .map_err(write_err)?;
    io::copy(&mut input, tmp.as_file_mut()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    let written = tmp.as_file().metadata().map_err(write_err)?.len();
    if written != input_meta.len() {
        return Err(write_err(io::Error::other(format!(
            "short write: {written} of {} bytes",
            input_meta.len()
        ))));
    }
    fs::set_permissions(tmp.path(), input_meta.permissions()).map_err(write_err)?;

    tmp.persist_noclobber(destination).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            Error::DestinationCollision(destination.to_path_buf())
        } else {
            write_err(e.error)
        }
    })?;
    Ok(())
}

/// Move `source` to a destination that must not exist yet.
///
/// Returns `true` when the move crossed devices and was carried out as copy
/// followed by removal of the source.
pub fn move_file(source: &Path, destination: &Path) -> Result<bool> {
    ensure_parent(destination)?;
    let write_err = |e: io::Error| Error::Write {
        path: destination.to_path_buf(),
        source: e,
    };

    // Linking fails with AlreadyExists instead of replacing a file that shows
    // up after planning; rename is only used where links are unsupported.
    let moved = match relink(source, destination) {
        Ok(()) => Ok(()),
        Err(Relink::Link(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::DestinationCollision(destination.to_path_buf()));
        }
        Err(Relink::Link(e)) if e.kind() == io::ErrorKind::CrossesDevices => Err(e),
        Err(Relink::Link(e)) => {
            debug!("hard link to {} failed ({e}), renaming", destination.display());
            if fs::symlink_metadata(destination).is_ok() {
                return Err(Error::DestinationCollision(destination.to_path_buf()));
            }
            fs::rename(source, destination)
        }
        Err(Relink::Unlink(e)) => {
            return Err(Error::RemoveSource {
                path: source.to_path_buf(),
                source: e,
            });
        }
    };

    match moved {
        Ok(()) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "{} and {} are on different devices, falling back to copy",
                source.display(),
                destination.display()
            );
            copy_file(source, destination)?;
            fs::remove_file(source).map_err(|e| Error::RemoveSource {
                path: source.to_path_buf(),
                source: e,
            })?;
            Ok(true)
        }
        Err(e) => Err(write_err(e)),
    }
}

enum Relink {
    Link(io::Error),
    Unlink(io::Error),
}

/// Hard-link `source` at `destination`, then drop the source name. If the
/// source cannot be removed the new link is taken back.
fn relink(source: &Path, destination: &Path) -> std::result::Result<(), Relink> {
    fs::hard_link(source, destination).map_err(Relink::Link)?;
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(Relink::Unlink(e));
    }
    Ok(())
}

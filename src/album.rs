//! Album-level decisions. Files are grouped by their source directory; the
//! whole group is classified and filtered together so that all tracks of an
//! album take the same path.

mod classify;
mod filter;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use classify::is_compilation;
pub use filter::AlbumFilter;

/// Files sharing one source directory, as indices into the caller's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumGroup {
    pub directory: PathBuf,
    pub members: Vec<usize>,
}

/// Group `paths` by parent directory, ordered by directory.
pub fn group_by_directory<P: AsRef<Path>>(paths: &[P]) -> Vec<AlbumGroup> {
    let mut groups: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (index, path) in paths.iter().enumerate() {
        let directory = path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        groups.entry(directory).or_default().push(index);
    }
    groups
        .into_iter()
        .map(|(directory, members)| AlbumGroup { directory, members })
        .collect()
}

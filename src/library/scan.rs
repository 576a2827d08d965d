use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Whether `path` carries one of `extensions` (case-insensitive, leading dots
/// in the list are ignored).
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .any(|e| !e.is_empty() && e == ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Collect the files under `root` whose extension is allowed, sorted by path.
///
/// A file given directly as `root` is returned as is, so the relocation
/// engine can report it even when its extension is not allowed.
pub fn scan(root: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = Vec::new();

    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && has_allowed_extension(path, &settings.extensions) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn has_allowed_extension_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        let exts = &settings.extensions;
        assert!(has_allowed_extension(Path::new("/tmp/a.mp3"), exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.MP3"), exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.flac"), exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.m4a"), exts));
        assert!(has_allowed_extension(Path::new("/tmp/a.wma"), exts));
        assert!(!has_allowed_extension(Path::new("/tmp/a.ogg"), exts));
        assert!(!has_allowed_extension(Path::new("/tmp/a.txt"), exts));
        assert!(!has_allowed_extension(Path::new("/tmp/a"), exts));
        assert!(has_allowed_extension(
            Path::new("/tmp/a.ogg"),
            &[".OGG".to_string()]
        ));
    }

    #[test]
    fn scan_filters_extensions_and_sorts() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("a.flac"), b"not a real flac").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"ignore me").unwrap();

        let files = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(
            files,
            vec![dir.path().join("a.flac"), dir.path().join("b.MP3")]
        );
    }

    #[test]
    fn scan_of_a_single_file_returns_it_unfiltered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"x").unwrap();

        assert_eq!(scan(&path, &LibrarySettings::default()), vec![path]);
    }

    #[test]
    fn scan_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();
        let hidden_dir = dir.path().join(".trash");
        fs::create_dir_all(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("old.mp3"), b"not real").unwrap();

        let files = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(files, vec![dir.path().join("visible.mp3")]);

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan(dir.path(), &settings).len(), 3);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let files = scan(dir.path(), &settings);
        assert_eq!(files, vec![dir.path().join("root.mp3")]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let files = scan(dir.path(), &settings);
        assert!(files.contains(&dir.path().join("root.mp3")));
        assert!(files.contains(&d1.join("one.mp3")));
        assert!(!files.contains(&d2.join("two.mp3")));
    }
}

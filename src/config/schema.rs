use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default format for regular albums.
pub const DEFAULT_FORMAT: &str = "$artist_initial/$artistsafe_sort/\
%shorten{${album},32}%ifdef{year_safe,_${year_safe}}/\
${disctrack}_%shorten{$title,32}";

/// Default format for compilations (albums with several artists).
pub const DEFAULT_COMPILATION_FORMAT: &str = "_compilations/$album_initial/\
$album%ifdef{year_safe,_${year_safe}}/\
${disctrack}_%shorten{$title,32}";

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/audiorename/config.toml` or `~/.config/audiorename/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `AUDIORENAME__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub rename: RenameSettings,
    pub filter: FilterSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenameSettings {
    /// Format string for regular albums.
    pub format: String,
    /// Format string for compilations.
    pub compilation_format: String,
    /// Avoid whitespace, punctuation and non-ASCII characters in generated names.
    pub shell_friendly: bool,
    /// Only report what would happen.
    pub dry_run: bool,
    /// Copy instead of move.
    pub copy: bool,
    /// Root of the generated layout. Defaults to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dir: Option<PathBuf>,
    /// Use each file's own directory as the root of the generated layout.
    pub source_as_target_dir: bool,
    /// Skip files whose given field is empty after normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_if_empty: Option<String>,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            compilation_format: DEFAULT_COMPILATION_FORMAT.to_string(),
            shell_friendly: false,
            dry_run: false,
            copy: false,
            target_dir: None,
            source_as_target_dir: false,
            skip_if_empty: None,
        }
    }
}

/// Album-level gates. Both are off by default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Only rename albums with at least this many files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_min: Option<usize>,
    /// Only rename albums whose file count matches their track total.
    pub album_complete: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to rename (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "m4a".into(), "flac".into(), "wma".into()],
            follow_links: false,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

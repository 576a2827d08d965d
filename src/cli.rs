use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

/// Rename audio files from metadata tags.
///
/// By default files are moved below the current working directory. Use
/// `--target-dir` to choose another root, or `--source-as-target-dir` to
/// rename within each file's own directory.
#[derive(Parser, Debug)]
#[command(name = "audiorename")]
#[command(version)]
pub struct Cli {
    /// A folder containing audio files or a single audio file
    #[arg(required_unless_present = "print_config")]
    pub path: Option<PathBuf>,

    /// Format string for regular albums
    #[arg(short, long)]
    pub format: Option<String>,

    /// Format string for compilations
    #[arg(short, long = "compilation")]
    pub compilation: Option<String>,

    /// Generate names without whitespace, parentheses, punctuation or non-ASCII characters
    #[arg(short = 'S', long)]
    pub shell_friendly: bool,

    /// Don't rename or copy the audio files, only show what would happen
    #[arg(short, long)]
    pub dry_run: bool,

    /// Comma separated list of extensions to rename
    #[arg(short, long = "extension", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Target directory
    #[arg(short, long, conflicts_with = "source_as_target_dir")]
    pub target_dir: Option<PathBuf>,

    /// Skip files whose given field is empty
    #[arg(short, long, value_name = "FIELD")]
    pub skip_if_empty: Option<String>,

    /// Use the directory of each source file as target directory
    #[arg(short = 'a', long)]
    pub source_as_target_dir: bool,

    /// Copy files instead of moving them
    #[arg(short = 'C', long)]
    pub copy: bool,

    /// Rename only albums containing at least COUNT files
    #[arg(short = 'm', long, value_name = "COUNT")]
    pub filter_album_min: Option<usize>,

    /// Rename only complete albums
    #[arg(short = 'F', long)]
    pub filter_album_complete: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Overlay flags given on the command line onto `settings`. Flags that
    /// were not given leave the loaded value alone.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(format) = &self.format {
            settings.rename.format = format.clone();
        }
        if let Some(format) = &self.compilation {
            settings.rename.compilation_format = format.clone();
        }
        if let Some(extensions) = &self.extensions {
            settings.library.extensions = extensions.clone();
        }
        if let Some(target) = &self.target_dir {
            settings.rename.target_dir = Some(target.clone());
            settings.rename.source_as_target_dir = false;
        }
        if self.source_as_target_dir {
            settings.rename.source_as_target_dir = true;
            settings.rename.target_dir = None;
        }
        if let Some(field) = &self.skip_if_empty {
            settings.rename.skip_if_empty = Some(field.clone());
        }
        if let Some(min) = self.filter_album_min {
            settings.filter.album_min = Some(min);
        }
        settings.rename.shell_friendly |= self.shell_friendly;
        settings.rename.dry_run |= self.dry_run;
        settings.rename.copy |= self.copy;
        settings.filter.album_complete |= self.filter_album_complete;
    }
}

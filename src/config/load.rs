use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment
/// variables (prefix `AUDIORENAME__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from an optional config file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("AUDIORENAME")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.extensions")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.rename.format.trim().is_empty() {
            return Err("rename.format must not be empty".to_string());
        }
        if self.rename.compilation_format.trim().is_empty() {
            return Err("rename.compilation_format must not be empty".to_string());
        }
        if self.rename.target_dir.is_some() && self.rename.source_as_target_dir {
            return Err(
                "rename.target_dir and rename.source_as_target_dir are mutually exclusive"
                    .to_string(),
            );
        }
        if self.filter.album_min == Some(0) {
            return Err("filter.album_min must be >= 1".to_string());
        }
        if !self
            .library
            .extensions
            .iter()
            .any(|e| !e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `AUDIORENAME_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("AUDIORENAME_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/audiorename/config.toml`
/// or `~/.config/audiorename/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("audiorename").join("config.toml"))
}

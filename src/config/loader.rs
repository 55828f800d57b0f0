use super::Config;
use crate::error::ConfigError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// `<config dir>/laura/config.toml`, e.g. `~/.config/laura/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "laura").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, then the config file, then environment overrides.
    ///
    /// An explicit path must exist; the default path is only read when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

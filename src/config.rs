//! Configuration loading and management
//!
//! Handles parsing of the optional user config at
//! `<config dir>/tsk/config.toml` (for example `~/.config/tsk/config.toml`
//! on Linux). Every setting has a default; a missing or unreadable file
//! means defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::ExportFormat;

/// File name of the persisted task list inside the platform data dir
const DATA_FILE_NAME: &str = "tasks.json";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Task file location override; when unset the platform data dir is used
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            export: ExportConfig::default(),
        }
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exports land in when `--out` is not given; defaults to the
    /// working directory
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// File stem for default export names (`<stem>.csv`, `<stem>.md`)
    #[serde(default = "default_export_stem")]
    pub stem: String,
}

fn default_export_stem() -> String {
    "tasks".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            stem: default_export_stem(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user-level config, or return defaults when it is missing or
    /// unreadable
    pub fn load_user() -> Self {
        match config_file_path() {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved task file location: the configured override, or the platform
    /// data dir, or `./tasks.json` when no home is available
    pub fn data_path(&self) -> PathBuf {
        match &self.data_file {
            Some(path) => path.clone(),
            None => default_data_path(),
        }
    }

    /// Default output path for an export in `format`
    pub fn export_path(&self, format: ExportFormat) -> PathBuf {
        let name = format!("{}.{}", self.export.stem, format.extension());
        match &self.export.dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn validate(&self) -> Result<()> {
        let stem = self.export.stem.trim();
        if stem.is_empty() {
            return Err(Error::InvalidConfig(
                "export.stem cannot be empty".to_string(),
            ));
        }
        if stem.contains('/') || stem.contains('\\') {
            return Err(Error::InvalidConfig(
                "export.stem must be a file name, not a path".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform directories for tsk (config and data)
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tsk")
}

/// Location of the user config file, when a home directory exists
pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default task file location
pub fn default_data_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(DATA_FILE_NAME),
        None => PathBuf::from(DATA_FILE_NAME),
    }
}

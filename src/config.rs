use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GitAutoError, Result};

/// Persisted configuration: the working repository the engine operates on.
///
/// Absence of `repo_path` means "no repository configured"; the engine
/// refuses to start any operation until one is set.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repo_path: Option<PathBuf>,
}

impl Config {
    /// Returns a handle for the configured repository, if any.
    pub fn repo_handle(&self) -> Option<RepoHandle> {
        self.repo_path.clone().map(RepoHandle::new)
    }
}

/// An absolute path to a repository root plus its validity predicate.
///
/// The engine never creates or deletes the repository; it only checks the
/// handle before each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    path: PathBuf,
}

impl RepoHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RepoHandle { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path is a usable repository iff it contains a `.git` directory.
    pub fn is_valid(&self) -> bool {
        self.path.join(".git").is_dir()
    }

    /// Last path component, for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitauto.toml` in current directory
/// 3. `.gitauto.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitauto.toml").exists() {
        fs::read_to_string("./gitauto.toml")?
    } else if let Some(path) = default_config_path() {
        if path.exists() {
            fs::read_to_string(path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Saves configuration, either to an explicit path or to the user config
/// directory.
pub fn save_config(config: &Config, config_path: Option<&str>) -> Result<()> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => default_config_path()
            .ok_or_else(|| GitAutoError::config("cannot determine config directory"))?,
    };

    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Removes the saved configuration file, if present.
pub fn clear_saved_config() -> Result<()> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(".gitauto.toml"))
}

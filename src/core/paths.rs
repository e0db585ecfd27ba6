// src/core/paths.rs

use crate::{
    constants::{CONFIG_ENV_VAR, CONFIG_FILENAME, CONFIG_FOLDER_NAME, LOG_FILENAME},
    errors::SwankyError,
};
use std::env;
use std::path::{Path, PathBuf};

/// Where the two configuration documents live for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// The local (project) document.
    pub local: PathBuf,
    /// The system (user) document.
    pub system: PathBuf,
}

impl ConfigPaths {
    pub fn new(local: impl Into<PathBuf>, system: impl Into<PathBuf>) -> Self {
        Self {
            local: local.into(),
            system: system.into(),
        }
    }

    /// Resolves both paths from the environment.
    ///
    /// The local document is `swanky.config.json` in the working directory unless
    /// `SWANKY_CONFIG` names another file. An override that points nowhere is a fatal
    /// configuration error, unlike a project that simply has no config yet.
    pub fn resolve() -> Result<Self, SwankyError> {
        let cwd = env::current_dir().map_err(|e| {
            SwankyError::file("Could not determine the current directory.").with_source(e)
        })?;
        Ok(Self {
            local: local_document_path(env::var(CONFIG_ENV_VAR).ok(), &cwd)?,
            system: system_config_dir()?.join(CONFIG_FILENAME),
        })
    }

    /// The directory the local document sits in; contracts and artifacts are relative to it.
    pub fn project_root(&self) -> PathBuf {
        match self.local.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Picks the local document: the override when it is set and not blank, else
/// `swanky.config.json` in `cwd`. A set override must point at an existing file.
pub fn local_document_path(
    override_path: Option<String>,
    cwd: &Path,
) -> Result<PathBuf, SwankyError> {
    let Some(raw) = override_path.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(cwd.join(CONFIG_FILENAME));
    };

    let path = expand_path(raw.trim())?;
    if !path.exists() {
        return Err(SwankyError::config(format!(
            "{} points to '{}', which does not exist.",
            CONFIG_ENV_VAR,
            path.display()
        )));
    }
    Ok(path)
}

/// Returns `<home>/swanky`, the folder holding the system configuration and the log file.
pub fn system_config_dir() -> Result<PathBuf, SwankyError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FOLDER_NAME))
        .ok_or_else(|| SwankyError::config("Could not find the user's home directory."))
}

/// Returns the path of the log file. Does not create it.
pub fn log_file_path() -> Result<PathBuf, SwankyError> {
    system_config_dir().map(|dir| dir.join(LOG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user-supplied path.
pub fn expand_path(template: &str) -> Result<PathBuf, SwankyError> {
    let expanded = shellexpand::full(template).map_err(|e| {
        SwankyError::input(format!("Failed to expand path '{}'.", template)).with_source(e)
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Joins `path` onto `root` unless it is already absolute.
pub fn resolve_against(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

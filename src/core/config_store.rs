//! # Config Store
//!
//! Reads and writes the two configuration documents. The local document (project root)
//! owns `node`, `contracts` and `env`; the system document (user home) owns
//! `defaultAccount`, `accounts` and `networks`. Loading never writes; `store` writes one
//! layer at a time and only the fields that layer owns.

use crate::{
    constants::CONFIG_FILENAME,
    core::paths::ConfigPaths,
    errors::SwankyError,
    models::{ProjectConfig, SwankyConfig, SystemConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Which document a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    Local,
    Global,
}

/// Loads the project document. A missing file is a `NotFound` config error.
pub fn load_local(paths: &ConfigPaths) -> Result<ProjectConfig, SwankyError> {
    read_document(&paths.local, "project")
}

/// Loads the user document, independently of the project one.
pub fn load_system(paths: &ConfigPaths) -> Result<SystemConfig, SwankyError> {
    read_document(&paths.system, "system")
}

/// Loads both documents, tolerating either one being absent, and merges them.
pub fn load_merged(paths: &ConfigPaths) -> Result<SwankyConfig, SwankyError> {
    let local = tolerate_missing(load_local(paths))?;
    let system = tolerate_missing(load_system(paths))?;
    Ok(merge(local, system))
}

/// Merges the two layers into the view commands work with.
///
/// The layers own disjoint fields, so the union is shallow and each field has exactly
/// one source. A missing layer contributes its empty defaults.
pub fn merge(local: Option<ProjectConfig>, system: Option<SystemConfig>) -> SwankyConfig {
    let ProjectConfig {
        node,
        contracts,
        env,
    } = local.unwrap_or_default();
    let SystemConfig {
        default_account,
        accounts,
        networks,
    } = system.unwrap_or_default();

    SwankyConfig {
        node,
        contracts,
        env,
        default_account,
        accounts,
        networks,
    }
}

/// Writes the fields owned by `layer` as pretty-printed JSON.
///
/// With `base_path`, the document is written to `<base_path>/swanky.config.json` instead
/// of the path resolved for this invocation. Parent directories are created for the
/// global layer.
pub fn store(
    config: &SwankyConfig,
    layer: ConfigLayer,
    paths: &ConfigPaths,
    base_path: Option<&Path>,
) -> Result<PathBuf, SwankyError> {
    let target = match (base_path, layer) {
        (Some(base), _) => base.join(CONFIG_FILENAME),
        (None, ConfigLayer::Local) => paths.local.clone(),
        (None, ConfigLayer::Global) => paths.system.clone(),
    };

    match layer {
        ConfigLayer::Local => write_document(&target, &config.project_layer(), false)?,
        ConfigLayer::Global => write_document(&target, &config.system_layer(), true)?,
    }

    log::info!("Stored {:?} configuration at {}", layer, target.display());
    Ok(target)
}

// --- Helpers ---

fn tolerate_missing<T>(result: Result<T, SwankyError>) -> Result<Option<T>, SwankyError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_config_not_found() => {
            log::debug!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn read_document<T: DeserializeOwned>(path: &Path, label: &str) -> Result<T, SwankyError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SwankyError::config_not_found(format!(
                "No {} configuration found at '{}'.",
                label,
                path.display()
            )));
        }
        Err(e) => {
            return Err(SwankyError::file(format!(
                "Could not read {} configuration '{}'.",
                label,
                path.display()
            ))
            .with_source(e));
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        SwankyError::config(format!(
            "The {} configuration at '{}' is not valid.",
            label,
            path.display()
        ))
        .with_source(e)
    })
}

fn write_document<T: Serialize>(
    path: &Path,
    value: &T,
    create_parents: bool,
) -> Result<(), SwankyError> {
    if create_parents && let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SwankyError::file(format!("Could not create directory '{}'.", parent.display()))
                .with_source(e)
        })?;
    }

    let mut json = serde_json::to_string_pretty(value).map_err(|e| {
        SwankyError::config("Could not serialize the configuration.").with_source(e)
    })?;
    json.push('\n');

    fs::write(path, json).map_err(|e| {
        SwankyError::file(format!("Could not write '{}'.", path.display())).with_source(e)
    })
}

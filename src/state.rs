// src/state.rs

use crate::core::{
    config_store::{self, ConfigLayer},
    paths::ConfigPaths,
};
use crate::errors::SwankyError;
use crate::models::{SwankyConfig, SystemConfig};
use std::path::PathBuf;

/// Everything a command handler needs: where the documents live and the merged view
/// loaded from them. Built once per invocation and handed to the handler by `&mut`.
#[derive(Debug, Clone)]
pub struct CommandContext {
    paths: ConfigPaths,
    config: SwankyConfig,
    has_local: bool,
    has_system: bool,
}

impl CommandContext {
    /// Loads both layers. Either may be absent; a present but broken one is an error.
    pub fn load(paths: ConfigPaths) -> Result<Self, SwankyError> {
        let local = match config_store::load_local(&paths) {
            Ok(local) => Some(local),
            Err(e) if e.is_config_not_found() => None,
            Err(e) => return Err(e),
        };
        let system = match config_store::load_system(&paths) {
            Ok(system) => Some(system),
            Err(e) if e.is_config_not_found() => None,
            Err(e) => return Err(e),
        };

        log::debug!(
            "Loaded configuration (local: {}, system: {})",
            local.is_some(),
            system.is_some()
        );

        Ok(Self {
            has_local: local.is_some(),
            has_system: system.is_some(),
            config: config_store::merge(local, system),
            paths,
        })
    }

    /// A context over an in-memory configuration, as if both documents existed.
    pub fn from_parts(paths: ConfigPaths, config: SwankyConfig) -> Self {
        Self {
            paths,
            config,
            has_local: true,
            has_system: true,
        }
    }

    pub fn config(&self) -> &SwankyConfig {
        &self.config
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn project_root(&self) -> PathBuf {
        self.paths.project_root()
    }

    pub fn has_local(&self) -> bool {
        self.has_local
    }

    /// Fails unless a project document was found, for commands that only make sense
    /// inside a project.
    pub fn require_local(&self) -> Result<&SwankyConfig, SwankyError> {
        if self.has_local {
            Ok(&self.config)
        } else {
            Err(SwankyError::config_not_found(format!(
                "No swanky project found: '{}' does not exist.",
                self.paths.local.display()
            )))
        }
    }

    /// The configuration to start a user-level change from. Without a system document
    /// yet, the seeded defaults stand in for it so the first write produces a full one.
    pub fn system_base(&self) -> SwankyConfig {
        if self.has_system {
            return self.config.clone();
        }
        let SystemConfig {
            default_account,
            accounts,
            networks,
        } = SystemConfig::seeded();
        SwankyConfig {
            default_account,
            accounts,
            networks,
            ..self.config.clone()
        }
    }

    /// Persists `layer` of `config` and, only once that succeeded, adopts it as the
    /// in-memory view.
    pub fn commit(&mut self, config: SwankyConfig, layer: ConfigLayer) -> Result<PathBuf, SwankyError> {
        let written = config_store::store(&config, layer, &self.paths, None)?;
        match layer {
            ConfigLayer::Local => self.has_local = true,
            ConfigLayer::Global => self.has_system = true,
        }
        self.config = config;
        Ok(written)
    }
}

// src/core/manifest.rs

use crate::errors::SwankyError;
use std::{collections::BTreeMap, fs, path::Path};
use toml::{Table, Value};

/// True for the crates that make up the ink! language: `ink` itself and `ink_*`.
pub fn is_ink_dependency(name: &str) -> bool {
    name == "ink" || name.starts_with("ink_")
}

/// The ink! dependencies of one contract manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InkDependencies {
    /// Dependency name to declared version (or git tag).
    pub versions: BTreeMap<String, String>,
    /// ink! crates with nothing to compare: path, branch or workspace-inherited entries.
    pub unversioned: Vec<String>,
}

/// Reads a contract's `Cargo.toml` and returns its ink! dependencies.
pub fn read_ink_dependencies(manifest_path: &Path) -> Result<InkDependencies, SwankyError> {
    let content = fs::read_to_string(manifest_path).map_err(|e| {
        SwankyError::file(format!(
            "Could not read contract manifest '{}'.",
            manifest_path.display()
        ))
        .with_source(e)
    })?;
    parse_ink_dependencies(&content, manifest_path)
}

/// Collects every `[dependencies]` entry named `ink` or `ink_*`, mapped to its declared
/// version. Git dependencies without a version contribute their `tag` instead; entries
/// with neither are listed as unversioned.
pub fn parse_ink_dependencies(content: &str, origin: &Path) -> Result<InkDependencies, SwankyError> {
    let manifest: Table = toml::from_str(content).map_err(|e| {
        SwankyError::config(format!("Contract manifest '{}' is not valid TOML.", origin.display()))
            .with_source(e)
    })?;

    let mut found = InkDependencies::default();
    let Some(dependencies) = manifest.get("dependencies").and_then(Value::as_table) else {
        return Ok(found);
    };

    for (name, spec) in dependencies.iter().filter(|(name, _)| is_ink_dependency(name)) {
        let declared = match spec {
            Value::String(version) => Some(version.clone()),
            Value::Table(table) => table
                .get("version")
                .or_else(|| table.get("tag"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        match declared {
            Some(version) => {
                found.versions.insert(name.clone(), version);
            }
            None => {
                log::debug!(
                    "Dependency '{}' in '{}' declares neither a version nor a tag.",
                    name,
                    origin.display()
                );
                found.unversioned.push(name.clone());
            }
        }
    }

    Ok(found)
}

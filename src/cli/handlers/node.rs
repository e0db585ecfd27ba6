// src/cli/handlers/node.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::{
    cli::args::{NodeArgs, NodeCommand},
    core::{
        config_builder::{ConfigBuilder, NodeSettingsPatch},
        config_store::ConfigLayer,
        paths,
    },
    errors::SwankyError,
    state::CommandContext,
};

/// The main handler for the `node` command group.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    match NodeArgs::try_parse_from(&args)?.command {
        NodeCommand::Show => show(ctx),
        NodeCommand::Set {
            path,
            version,
            supported_ink,
            pallet,
        } => {
            let patch = NodeSettingsPatch {
                local_path: path,
                polkadot_pallet_versions: pallet,
                supported_ink,
                version,
            };
            set(ctx, patch)
        }
    }
}

fn show(ctx: &CommandContext) -> Result<()> {
    let node = &ctx.require_local()?.node;
    println!("\n--- {} ---", t!("node.header").bold());

    if !node.is_installed() {
        println!("  {}", t!("node.info.not_installed").dimmed());
        return Ok(());
    }
    commons::print_row(t!("node.label.version"), &node.version);
    commons::print_row(t!("node.label.supported_ink"), &node.supported_ink);
    commons::print_row(t!("node.label.pallets"), &node.polkadot_pallet_versions);
    commons::print_row(t!("node.label.path"), &node.local_path);
    Ok(())
}

fn set(ctx: &mut CommandContext, mut patch: NodeSettingsPatch) -> Result<()> {
    let config = ctx.require_local()?;
    if patch == NodeSettingsPatch::default() {
        return Err(SwankyError::input(t!("node.error.nothing_to_set")).into());
    }

    if let Some(raw) = patch.local_path.take() {
        let expanded = paths::expand_path(&raw)?;
        let on_disk = paths::resolve_against(&ctx.project_root(), &expanded.to_string_lossy());
        if !on_disk.exists() {
            return Err(SwankyError::file(format!(
                t!("node.error.path_missing"),
                path = on_disk.display()
            ))
            .into());
        }
        patch.local_path = Some(expanded.to_string_lossy().into_owned());
    }

    for version in [&patch.version, &patch.supported_ink].into_iter().flatten() {
        validate_version(version)?;
    }

    let updated = ConfigBuilder::new(config).update_node_settings(patch).build();
    ctx.commit(updated, ConfigLayer::Local)?;
    commons::print_success(t!("node.success.updated"));
    Ok(())
}

fn validate_version(version: &str) -> Result<(), SwankyError> {
    semver::Version::parse(version).map(|_| ()).map_err(|e| {
        SwankyError::input(format!(t!("node.error.invalid_version"), version = version))
            .with_source(e)
    })
}

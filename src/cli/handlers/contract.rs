// src/cli/handlers/contract.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

use super::commons;
use crate::{
    cli::args::{ContractArgs, ContractCommand},
    constants::{ARTIFACTS_DIR, CONTRACT_MANIFEST_FILENAME, CONTRACTS_DIR},
    core::{config_builder::ConfigBuilder, config_store::ConfigLayer, paths},
    errors::SwankyError,
    models::{BuildMode, BuildRecord, ContractRecord, SwankyConfig, now_millis},
    state::CommandContext,
    system::executor,
};

/// Extensions of the files `cargo contract build` leaves in `target/ink` that are kept.
const ARTIFACT_EXTENSIONS: &[&str] = &["contract", "json", "wasm"];

/// The main handler for the `contract` command group.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    match ContractArgs::try_parse_from(&args)?.command {
        ContractCommand::List => list(ctx),
        ContractCommand::Add { name, module_name } => add(ctx, name, module_name),
        ContractCommand::Build {
            name,
            all,
            release,
            verifiable,
        } => {
            let mode = if verifiable {
                BuildMode::Verifiable
            } else if release {
                BuildMode::Release
            } else {
                BuildMode::Debug
            };
            build(ctx, name, all, mode)
        }
        ContractCommand::Verify { name } => verify(ctx, &name),
    }
}

fn list(ctx: &CommandContext) -> Result<()> {
    let config = ctx.require_local()?;
    println!("\n--- {} ---", t!("contract.header").bold());

    if config.contracts.is_empty() {
        println!("  {}", t!("contract.info.none").dimmed());
        return Ok(());
    }

    for contract in config.contracts.values() {
        println!("\n  {}", contract.name.cyan().bold());
        if contract.module_name != contract.name {
            commons::print_row(t!("contract.label.module"), &contract.module_name);
        }

        match &contract.build {
            Some(build) => {
                let verified = if build.is_verified {
                    format!(" [{}]", t!("contract.label.verified")).green()
                } else {
                    "".normal()
                };
                commons::print_row(
                    t!("contract.label.build"),
                    format!("{} {}{}", build.build_mode, commons::format_age(build.timestamp).dimmed(), verified),
                );
            }
            None => commons::print_row(t!("contract.label.build"), t!("contract.label.not_built").dimmed()),
        }

        match contract.latest_deployment() {
            Some(deployment) => commons::print_row(
                t!("contract.label.deployed"),
                format!(
                    "{} @ {} {}",
                    deployment.address,
                    deployment.network_url,
                    commons::format_age(deployment.timestamp).dimmed()
                ),
            ),
            None => commons::print_row(t!("contract.label.deployed"), t!("common.label.none").dimmed()),
        }
    }
    Ok(())
}

fn add(ctx: &mut CommandContext, name: String, module_name: Option<String>) -> Result<()> {
    let config = ctx.require_local()?;
    if config.contracts.contains_key(&name) {
        return Err(SwankyError::input(format!(t!("contract.error.duplicate"), name = name)).into());
    }

    let manifest = contract_dir(&ctx.project_root(), &name).join(CONTRACT_MANIFEST_FILENAME);
    if !manifest.is_file() {
        return Err(SwankyError::file(format!(
            t!("contract.error.manifest_missing"),
            path = manifest.display()
        ))
        .into());
    }

    let module_name = module_name.unwrap_or_else(|| name.clone());
    let updated = ConfigBuilder::new(config)
        .add_contract(ContractRecord::new(&name, &module_name))
        .build();
    ctx.commit(updated, ConfigLayer::Local)?;
    commons::print_success(&format!(t!("contract.success.added"), name = name));
    Ok(())
}

/// Resolves which contracts a `build` invocation targets.
fn build_targets(config: &SwankyConfig, name: Option<String>, all: bool) -> Result<Vec<String>, SwankyError> {
    match (name, all) {
        (_, true) => Ok(config.contracts.keys().cloned().collect()),
        (Some(name), false) if config.contracts.contains_key(&name) => Ok(vec![name]),
        (Some(name), false) => Err(SwankyError::config(format!(
            t!("contract.error.unknown"),
            name = name
        ))),
        (None, false) => Err(SwankyError::input(t!("contract.error.name_or_all"))),
    }
}

fn build(ctx: &mut CommandContext, name: Option<String>, all: bool, mode: BuildMode) -> Result<()> {
    let targets = build_targets(ctx.require_local()?, name, all)?;
    if targets.is_empty() {
        println!("{}", t!("contract.info.none").dimmed());
        return Ok(());
    }

    let root = ctx.project_root();
    for name in targets {
        println!(
            "\n{}",
            format!(t!("contract.info.building"), name = name.cyan(), mode = mode).bold()
        );

        let dir = contract_dir(&root, &name);
        let manifest = dir.join(CONTRACT_MANIFEST_FILENAME);
        if !manifest.is_file() {
            return Err(SwankyError::file(format!(
                t!("contract.error.manifest_missing"),
                path = manifest.display()
            ))
            .into());
        }

        let mut cargo_args: Vec<String> = vec![
            "contract".into(),
            "build".into(),
            "--manifest-path".into(),
            manifest.to_string_lossy().into_owned(),
        ];
        match mode {
            BuildMode::Debug => {}
            BuildMode::Release => cargo_args.push("--release".into()),
            BuildMode::Verifiable => cargo_args.push("--verifiable".into()),
        }

        executor::execute_program("cargo", &cargo_args, &root).map_err(|e| {
            SwankyError::process(format!(t!("contract.error.build_failed"), name = name))
                .with_source(e)
        })?;

        let relative_artifacts = format!("{}/{}", ARTIFACTS_DIR, name);
        let copied = copy_artifacts(&dir.join("target").join("ink"), &root.join(&relative_artifacts))?;
        log::info!("Copied {} artifacts for '{}'", copied, name);

        let updated = ConfigBuilder::new(ctx.config())
            .add_contract_build(
                &name,
                BuildRecord {
                    timestamp: now_millis(),
                    artifacts_path: relative_artifacts,
                    build_mode: mode,
                    is_verified: false,
                },
            )
            .build();
        ctx.commit(updated, ConfigLayer::Local)
            .with_context(|| format!(t!("contract.error.record_failed"), name = name))?;
        commons::print_success(&format!(t!("contract.success.built"), name = name, count = copied));
    }
    Ok(())
}

fn verify(ctx: &mut CommandContext, name: &str) -> Result<()> {
    let config = ctx.require_local()?;
    let contract = config
        .contracts
        .get(name)
        .ok_or_else(|| SwankyError::config(format!(t!("contract.error.unknown"), name = name)))?;
    let build = contract
        .build
        .as_ref()
        .ok_or_else(|| SwankyError::config(format!(t!("contract.error.not_built"), name = name)))?;
    if build.build_mode != BuildMode::Verifiable {
        return Err(SwankyError::input(format!(
            t!("contract.error.not_verifiable"),
            name = name,
            mode = build.build_mode
        ))
        .into());
    }

    let root = ctx.project_root();
    let bundle = paths::resolve_against(&root, &build.artifacts_path)
        .join(format!("{}.contract", contract.module_name));
    if !bundle.is_file() {
        return Err(SwankyError::file(format!(
            t!("contract.error.bundle_missing"),
            path = bundle.display()
        ))
        .into());
    }

    let verify_args: Vec<String> = vec![
        "contract".into(),
        "verify".into(),
        "--contract".into(),
        bundle.to_string_lossy().into_owned(),
    ];
    executor::execute_program("cargo", &verify_args, &contract_dir(&root, name)).map_err(|e| {
        SwankyError::process(format!(t!("contract.error.verify_failed"), name = name)).with_source(e)
    })?;

    let updated = ConfigBuilder::new(config).set_contract_verified(name).build();
    ctx.commit(updated, ConfigLayer::Local)?;
    commons::print_success(&format!(t!("contract.success.verified"), name = name));
    Ok(())
}

fn contract_dir(root: &Path, name: &str) -> PathBuf {
    root.join(CONTRACTS_DIR).join(name)
}

/// Copies the build outputs found directly in `source` into `destination`, which is
/// created if needed. Returns how many files were copied.
fn copy_artifacts(source: &Path, destination: &Path) -> Result<usize, SwankyError> {
    if !source.is_dir() {
        return Err(SwankyError::file(format!(
            t!("contract.error.artifacts_missing"),
            path = source.display()
        )));
    }
    fs::create_dir_all(destination).map_err(|e| {
        SwankyError::file(format!("Could not create '{}'.", destination.display())).with_source(e)
    })?;

    let mut copied = 0;
    let walker = WalkDir::new(source).min_depth(1).max_depth(1);
    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        let keep = entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext));
        if !keep {
            continue;
        }

        let target = destination.join(entry.file_name());
        fs::copy(path, &target).map_err(|e| {
            SwankyError::file(format!("Could not copy '{}'.", path.display())).with_source(e)
        })?;
        copied += 1;
    }
    Ok(copied)
}

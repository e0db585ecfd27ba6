// src/cli/handlers/check.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use std::fs;

use super::commons;
use crate::{
    cli::args::CheckArgs,
    core::{
        checker::{self, CheckInput},
        compatibility::CARGO_CONTRACT_INK_DEPS,
        config_builder::ConfigBuilder,
        config_store::ConfigLayer,
        version_extractor::TOOL_SPECS,
    },
    errors::SwankyError,
    models::{CompatibilityReport, HostInfo},
    state::CommandContext,
    system::executor::{CommandRunner, SystemRunner},
};

/// The main handler for the `check` command.
/// Checks the toolchain, the node and the contracts' ink! dependencies against each other.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    let runner = SystemRunner::new(ctx.project_root());
    run(args, ctx, &runner, HostInfo::current())
}

fn run(
    args: Vec<String>,
    ctx: &mut CommandContext,
    runner: &dyn CommandRunner,
    host: HostInfo,
) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;
    let root = ctx.project_root();
    let to_file = check_args.print.is_some();

    if !to_file {
        println!("\n{}\n", t!("check.header").bold());
    }

    let outcome = checker::run_check(
        CheckInput {
            config: ctx.config(),
            project_root: ctx.has_local().then_some(root.as_path()),
            host,
            table: CARGO_CONTRACT_INK_DEPS,
        },
        runner,
        !to_file,
    );
    let report = outcome.report;

    match &check_args.print {
        Some(path) => {
            let json = serde_json::to_string_pretty(&report.to_export_json())?;
            fs::write(path, json + "\n").map_err(|e| {
                SwankyError::file(format!(t!("check.error.write_report"), path = path.display()))
                    .with_source(e)
            })?;
            println!(
                "{}",
                format!(t!("check.info.report_written"), path = path.display()).dimmed()
            );
        }
        None => print_report(&report),
    }

    if check_args.save {
        save_tool_versions(ctx, &report)?;
    }

    if report.is_fatal() {
        return Err(anyhow!(format!(
            t!("check.error.fatal"),
            count = report.fatal.len()
        )));
    }
    Ok(())
}

/// Records every detected tool version in the project's `env` section.
fn save_tool_versions(ctx: &mut CommandContext, report: &CompatibilityReport) -> Result<()> {
    let config = ctx.require_local()?;
    let detected = report
        .tools
        .iter()
        .filter_map(|(key, version)| version.as_ref().map(|v| (key.clone(), v.clone())));
    let updated = ConfigBuilder::new(config).update_env(detected).build();
    let path = ctx.commit(updated, ConfigLayer::Local)?;
    commons::print_success(&format!(t!("check.success.saved"), path = path.display()));
    Ok(())
}

fn print_report(report: &CompatibilityReport) {
    println!("\n{}", t!("check.report.host").bold());
    commons::print_row(t!("check.label.platform"), &report.os.platform);
    commons::print_row(t!("check.label.architecture"), &report.os.architecture);

    println!("\n{}", t!("check.report.tools").bold());
    for spec in TOOL_SPECS.iter() {
        let shown = match report.tools.get(spec.key) {
            Some(Some(version)) => version.green(),
            Some(None) if spec.mandatory => t!("check.label.not_installed").red(),
            Some(None) => t!("check.label.not_installed").yellow(),
            None => t!("check.label.unknown").red(),
        };
        commons::print_row(spec.label, shown);
    }

    if !report.contract_dependency_versions.is_empty() {
        println!("\n{}", t!("check.report.contracts").bold());
        for (contract, deps) in &report.contract_dependency_versions {
            println!("  {}", contract.cyan());
            for (dep, declared) in deps {
                println!("    {:<20} {}", dep, declared.dimmed());
            }
        }
    }

    if !report.mismatched_versions.is_empty() {
        println!("\n{}", t!("check.report.mismatches").yellow().bold());
        for message in report.mismatched_versions.values() {
            println!("  {} {}", "!".yellow(), message);
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", t!("check.report.warnings").yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", "⚠".yellow(), warning.yellow());
        }
    }

    if report.is_fatal() {
        println!("\n{}", t!("check.report.fatal").red().bold());
        for fatal in &report.fatal {
            println!("  {} {}", "✖".red(), fatal.red());
        }
    } else {
        println!("\n{} {}", "✔".green(), t!("check.report.ok").green());
    }
}

// src/cli/handlers/config.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::{cli::args::ConfigArgs, models::SwankyConfig, state::CommandContext};

/// The main handler for the `config` command.
/// Prints the merged configuration with secrets masked.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;
    let shown = commons::masked(ctx.config());

    if config_args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("\n--- {} ---", t!("config.header").bold());
    commons::print_row(t!("config.label.local"), ctx.paths().local.display());
    commons::print_row(t!("config.label.system"), ctx.paths().system.display());
    if !ctx.has_local() {
        println!("  {}", t!("config.info.no_project").dimmed());
    }

    print_project_section(&shown);
    print_user_section(&shown);
    Ok(())
}

fn print_project_section(config: &SwankyConfig) {
    println!("\n  {}", t!("config.section.node").bold());
    if config.node.is_installed() {
        commons::print_row(t!("node.label.version"), &config.node.version);
        commons::print_row(t!("node.label.supported_ink"), &config.node.supported_ink);
        commons::print_row(t!("node.label.path"), &config.node.local_path);
    } else {
        println!("    {}", t!("node.info.not_installed").dimmed());
    }

    println!("\n  {}", t!("config.section.contracts").bold());
    if config.contracts.is_empty() {
        println!("    {}", t!("common.label.none").dimmed());
    }
    for contract in config.contracts.values() {
        let build = contract
            .build
            .as_ref()
            .map(|b| b.build_mode.to_string())
            .unwrap_or_else(|| t!("contract.label.not_built").to_string());
        println!("    - {} ({})", contract.name.cyan(), build.dimmed());
    }

    if !config.env.is_empty() {
        println!("\n  {}", t!("config.section.env").bold());
        for (key, value) in &config.env {
            println!("    {} = {}", key.cyan(), value);
        }
    }
}

fn print_user_section(config: &SwankyConfig) {
    println!("\n  {}", t!("config.section.accounts").bold());
    if config.accounts.is_empty() {
        println!("    {}", t!("common.label.none").dimmed());
    }
    for account in &config.accounts {
        println!(
            "    - {} {} {}",
            account.alias.cyan(),
            account.address.dimmed(),
            commons::mask_mnemonic(&account.mnemonic).dimmed()
        );
    }
    if let Some(default) = &config.default_account {
        commons::print_row(t!("account.label.default"), default);
    }

    println!("\n  {}", t!("config.section.networks").bold());
    for (name, network) in &config.networks {
        println!("    - {:<10} {}", name.cyan(), network.url);
    }
}

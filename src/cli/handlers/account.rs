// src/cli/handlers/account.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::{
    cli::args::{AccountArgs, AccountCommand},
    core::{config_builder::ConfigBuilder, config_store::ConfigLayer},
    errors::SwankyError,
    models::{AccountRecord, Mnemonic},
    state::CommandContext,
};

/// The main handler for the `account` command group.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    let account_args = AccountArgs::try_parse_from(&args)?;

    match account_args.command {
        AccountCommand::List => list(ctx),
        AccountCommand::Add {
            alias,
            address,
            mnemonic,
            dev,
            make_default,
        } => add(ctx, alias, address, mnemonic, dev, make_default),
        AccountCommand::Default { alias } => set_default(ctx, alias),
    }
}

fn list(ctx: &CommandContext) -> Result<()> {
    let config = ctx.system_base();
    println!("\n--- {} ---", t!("account.header").bold());

    for account in &config.accounts {
        let is_default = config.default_account.as_deref() == Some(account.alias.as_str());
        let marker = if is_default { "*".green() } else { " ".normal() };
        let dev_tag = if account.is_dev {
            format!("[{}]", t!("account.label.dev")).dimmed()
        } else {
            "".normal()
        };
        println!(
            "{} {:<12} {} {}",
            marker,
            account.alias.cyan(),
            account.address,
            dev_tag
        );
    }
    Ok(())
}

fn add(
    ctx: &mut CommandContext,
    alias: String,
    address: String,
    mnemonic: String,
    dev: bool,
    make_default: bool,
) -> Result<()> {
    // Non-dev accounts need their mnemonic encrypted by the signing client.
    if !dev {
        return Err(SwankyError::input(t!("account.error.non_dev_unsupported")).into());
    }

    let base = ctx.system_base();
    if base.account(&alias).is_some() {
        return Err(SwankyError::input(format!(t!("account.error.duplicate"), alias = alias)).into());
    }

    let mut builder = ConfigBuilder::new(&base).add_account(AccountRecord {
        alias: alias.clone(),
        mnemonic: Mnemonic::Plain(mnemonic),
        is_dev: true,
        address,
    });
    if make_default {
        builder = builder.set_default_account(alias.as_str());
    }

    ctx.commit(builder.build(), ConfigLayer::Global)?;
    commons::print_success(&format!(t!("account.success.added"), alias = alias));
    Ok(())
}

fn set_default(ctx: &mut CommandContext, alias: Option<String>) -> Result<()> {
    let base = ctx.system_base();

    let alias = match alias {
        Some(alias) => alias,
        None => {
            if !commons::is_interactive() {
                return Err(SwankyError::input(t!("account.error.alias_required")).into());
            }
            let aliases: Vec<String> = base.accounts.iter().map(|a| a.alias.clone()).collect();
            let current = base
                .default_account
                .as_ref()
                .and_then(|d| aliases.iter().position(|a| a == d))
                .unwrap_or(0);
            let chosen = commons::select_one(t!("account.prompt.select_default"), &aliases, current)?;
            aliases
                .get(chosen)
                .cloned()
                .ok_or_else(|| SwankyError::input(t!("account.error.alias_required")))?
        }
    };

    if base.account(&alias).is_none() {
        return Err(SwankyError::config(format!(t!("account.error.unknown"), alias = alias)).into());
    }

    let updated = ConfigBuilder::new(&base).set_default_account(alias.as_str()).build();
    ctx.commit(updated, ConfigLayer::Global)?;
    commons::print_success(&format!(t!("account.success.default_set"), alias = alias));
    Ok(())
}

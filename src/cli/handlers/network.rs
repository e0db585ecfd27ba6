// src/cli/handlers/network.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::{
    cli::args::{NetworkArgs, NetworkCommand},
    core::{config_builder::ConfigBuilder, config_store::ConfigLayer},
    errors::SwankyError,
    state::CommandContext,
};

/// The main handler for the `network` command group.
pub fn handle(args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    match NetworkArgs::try_parse_from(&args)?.command {
        NetworkCommand::List => {
            println!("\n--- {} ---", t!("network.header").bold());
            for (name, network) in &ctx.system_base().networks {
                println!("  {:<12} {}", name.cyan(), network.url);
            }
            Ok(())
        }
        NetworkCommand::Set { name, url } => {
            validate_url(&url)?;
            let updated = ConfigBuilder::new(&ctx.system_base())
                .update_network(name.as_str(), url.as_str())
                .build();
            ctx.commit(updated, ConfigLayer::Global)?;
            commons::print_success(&format!(t!("network.success.set"), name = name, url = url));
            Ok(())
        }
    }
}

/// Only WebSocket endpoints can serve the node's RPC subscriptions.
fn validate_url(url: &str) -> Result<(), SwankyError> {
    let scheme_ok = ["ws://", "wss://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme));
    if scheme_ok {
        Ok(())
    } else {
        Err(SwankyError::input(format!(t!("network.error.invalid_url"), url = url)))
    }
}

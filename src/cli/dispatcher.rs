use anyhow::Result;
use colored::Colorize;

use crate::{cli::handlers, state::CommandContext};

/// A top-level command, its aliases, and the handler receiving the remaining arguments.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut CommandContext) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "account",
        aliases: &["acc"],
        handler: handlers::account::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &[],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &["cfg"],
        handler: handlers::config::handle,
    },
    CommandDefinition {
        name: "contract",
        aliases: &["c"],
        handler: handlers::contract::handle,
    },
    CommandDefinition {
        name: "network",
        aliases: &["net"],
        handler: handlers::network::handle,
    },
    CommandDefinition {
        name: "node",
        aliases: &[],
        handler: handlers::node::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `swanky <command> [args...]` to its handler.
pub fn dispatch(all_args: Vec<String>, ctx: &mut CommandContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        println!("{}", t!("cli.info.no_command").dimmed());
        return Ok(());
    };

    match find_command(&name) {
        Some(command) => {
            log::info!("Running command '{}'", command.name);
            (command.handler)(args.collect(), ctx)
        }
        None => Err(crate::errors::SwankyError::input(format!(
            t!("cli.error.unknown_command"),
            name = name
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("contract").map(|c| c.name), Some("contract"));
        assert_eq!(find_command("c").map(|c| c.name), Some("contract"));
        assert_eq!(find_command("net").map(|c| c.name), Some("network"));
        assert!(find_command("deploy").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut seen = Vec::new();
        for cmd in COMMAND_REGISTRY {
            for name in std::iter::once(&cmd.name).chain(cmd.aliases.iter()) {
                assert!(!seen.contains(name), "duplicate command name '{}'", name);
                seen.push(*name);
            }
        }
    }
}

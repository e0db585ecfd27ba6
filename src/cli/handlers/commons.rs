// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};
use std::io::IsTerminal;

use crate::models::{Mnemonic, SwankyConfig, now_millis};

/// True when both ends of the terminal are attached, so prompting makes sense.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Asks the user to pick one of `items`; returns the chosen index.
pub fn select_one(prompt: &str, items: &[String], default: usize) -> Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .with_context(|| t!("common.error.prompt_failed"))
}

/// What is shown in place of a mnemonic.
pub fn mask_mnemonic(mnemonic: &Mnemonic) -> String {
    match mnemonic {
        Mnemonic::Plain(_) => "********".to_string(),
        Mnemonic::Encrypted(_) => t!("common.label.encrypted").to_string(),
    }
}

/// A copy of `config` safe to print.
pub fn masked(config: &SwankyConfig) -> SwankyConfig {
    let mut copy = config.clone();
    for account in &mut copy.accounts {
        if account.mnemonic.is_plain() {
            account.mnemonic = Mnemonic::Plain(mask_mnemonic(&account.mnemonic));
        }
    }
    copy
}

/// Renders a stored millisecond timestamp as a coarse age relative to now.
pub fn format_age(timestamp_ms: u64) -> String {
    format_age_at(timestamp_ms, now_millis())
}

fn format_age_at(timestamp_ms: u64, now_ms: u64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms) / 1000;
    match seconds {
        0..60 => t!("common.age.just_now").to_string(),
        60..3600 => format!(t!("common.age.minutes"), n = seconds / 60),
        3600..86400 => format!(t!("common.age.hours"), n = seconds / 3600),
        _ => format!(t!("common.age.days"), n = seconds / 86400),
    }
}

/// Prints one `label value` row of a details listing.
pub fn print_row(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", label.blue(), value);
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✔".green(), message.green());
}

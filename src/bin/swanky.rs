// src/bin/swanky.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use swanky::{
    cli::{Cli, dispatcher},
    core::paths::{self, ConfigPaths},
    errors::render_error,
    state::CommandContext,
};

/// The main entry point of `swanky`.
/// Sets up logging, loads the configuration, dispatches to the handler and turns any
/// error into a one-line message and a failure exit code.
fn main() {
    init_logging();

    if let Err(e) = run_cli(Cli::parse()) {
        // The full chain goes to the log file; the user gets the short form.
        log::error!("{:?}", e);
        eprintln!("\n{}: {}", "Error".red().bold(), render_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let paths = ConfigPaths::resolve()?;
    let mut ctx = CommandContext::load(paths)?;
    dispatcher::dispatch(cli.args, &mut ctx)
}

/// Logs go to `<home>/swanky/swanky.log`, or to stderr when that file cannot be opened.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    let log_file = paths::log_file_path().ok().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match log_file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }
    builder.init();
}

// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Arguments arrive without the command name in front.
pub struct CheckArgs {
    /// Write the report as JSON to this file instead of printing it.
    #[arg(short = 'o', long = "print", value_name = "PATH")]
    pub print: Option<PathBuf>,

    /// Store the detected tool versions in the project's `env` section.
    #[arg(long)]
    pub save: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ConfigArgs {
    /// Print the merged configuration as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List the accounts in the user configuration.
    #[command(alias = "ls")]
    List,
    /// Add a development account.
    Add {
        alias: String,
        /// SS58 address of the account.
        #[arg(long)]
        address: String,
        /// Mnemonic or secret URI (e.g. `//Dave`).
        #[arg(long)]
        mnemonic: String,
        /// Store the mnemonic in plaintext. Required.
        #[arg(long)]
        dev: bool,
        /// Also make it the default account.
        #[arg(long = "default")]
        make_default: bool,
    },
    /// Set the default account. Asks when no alias is given.
    Default { alias: Option<String> },
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    #[command(alias = "ls")]
    List,
    /// Add a network or change its URL.
    Set { name: String, url: String },
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    Show,
    /// Update the node metadata of the current project.
    Set {
        /// Path to the node binary.
        #[arg(long)]
        path: Option<String>,
        /// Version of the node binary.
        #[arg(long)]
        version: Option<String>,
        /// Highest ink! version the node supports.
        #[arg(long = "supported-ink")]
        supported_ink: Option<String>,
        /// Polkadot pallet versions the node was built against.
        #[arg(long = "pallet", value_name = "NAME=VER,...")]
        pallet: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ContractArgs {
    #[command(subcommand)]
    pub command: ContractCommand,
}

#[derive(Subcommand, Debug)]
pub enum ContractCommand {
    #[command(alias = "ls")]
    List,
    /// Register an existing contract under `contracts/<name>`.
    Add {
        name: String,
        /// Module name of the contract; defaults to the contract name.
        #[arg(long)]
        module_name: Option<String>,
    },
    /// Compile one contract, or all of them, and collect the artifacts.
    Build {
        name: Option<String>,
        #[arg(long)]
        all: bool,
        #[arg(long, conflicts_with = "verifiable")]
        release: bool,
        /// Reproducible build inside the verification image.
        #[arg(long)]
        verifiable: bool,
    },
    /// Verify the artifacts of a verifiable build.
    Verify { name: String },
}

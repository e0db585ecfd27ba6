// src/constants.rs

/// The name of the configuration document, both for a project and for the user.
pub const CONFIG_FILENAME: &str = "swanky.config.json";

/// The folder (under the user's home directory) holding the system configuration.
pub const CONFIG_FOLDER_NAME: &str = "swanky";

/// Environment variable overriding the location of the local (project) configuration.
pub const CONFIG_ENV_VAR: &str = "SWANKY_CONFIG";

/// The name of the log file written next to the system configuration.
pub const LOG_FILENAME: &str = "swanky.log";

/// The directory (relative to the project root) holding one folder per contract.
pub const CONTRACTS_DIR: &str = "contracts";

/// The directory (relative to the project root) where build artifacts are collected.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// The name of a contract's build manifest.
pub const CONTRACT_MANIFEST_FILENAME: &str = "Cargo.toml";

pub const DEFAULT_NETWORK_URL: &str = "ws://127.0.0.1:9944";
pub const DEFAULT_ASTAR_NETWORK_URL: &str = "wss://rpc.astar.network";
pub const DEFAULT_SHIDEN_NETWORK_URL: &str = "wss://rpc.shiden.astar.network";
pub const DEFAULT_SHIBUYA_NETWORK_URL: &str = "wss://shibuya.public.blastapi.io";

/// The dev account selected by default in a freshly seeded system configuration.
pub const DEFAULT_ACCOUNT: &str = "alice";

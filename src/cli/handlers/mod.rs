// src/cli/handlers/mod.rs

// One module per top-level command.

pub mod account;
pub mod check;
pub mod commons;
pub mod config;
pub mod contract;
pub mod network;
pub mod node;

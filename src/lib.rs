//! # swanky
//!
//! Toolbox for ink! smart-contract development. The library half holds the layered
//! configuration store, the toolchain compatibility checker and the process plumbing;
//! `src/bin/swanky.rs` wires them to the command line.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod errors;
pub mod models;
pub mod state;
pub mod system;

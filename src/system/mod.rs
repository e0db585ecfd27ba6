//! # System Interaction Layer
//!
//! The boundary between swanky's logic and the operating system.
//!
//! - **`executor`**: spawns external tools (`cargo`, `rustc`, `cargo contract`), either
//!   capturing their output for version detection or streaming it for builds.

pub mod executor;

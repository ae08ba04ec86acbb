//! Library exports for staybook-cli.
//!
//! The binary is built from `main.rs`; this target exposes the command
//! definitions so they can be tested and embedded.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod utils;

pub use cli::Cli;

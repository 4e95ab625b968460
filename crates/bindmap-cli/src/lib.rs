//! bindmap CLI library components.
//!
//! The binary in `main.rs` only parses arguments; the commands and output
//! formatters live here so they can be tested.

pub mod commands;
pub mod formatters;

pub use commands::{run_mapping, RunOptions, RunResult};

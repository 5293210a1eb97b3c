//! Tooling & Integration Layer
//!
//! Command-line entry point for scheduled or manual runs.

pub mod cli;

pub use cli::{Cli, CliContext};

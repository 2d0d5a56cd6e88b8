//! CLI module for the Vellum stack tool.
//!
//! Thin drivers over the core: per-stack configuration and deployment
//! snapshot import/export.

mod commands;
mod output;

pub use commands::{Cli, Commands, ConfigCommands, OutputFormat, StackCommands};
pub use output::OutputFormatter;

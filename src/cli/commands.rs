//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vellum - declarative infrastructure stack manager.
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The name of the stack to operate on.
    #[arg(short, long, global = true, env = "VELLUM_STACK", default_value = "dev")]
    pub stack: String,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query, set, or unset stack configuration values.
    Config {
        /// Configuration subcommand.
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage stack deployment snapshots.
    Stack {
        /// Stack subcommand.
        #[command(subcommand)]
        command: StackCommands,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List all configuration values for the stack.
    Ls,

    /// Read a single configuration value.
    Get {
        /// The configuration key, e.g. `aws:region`.
        key: String,
    },

    /// Set a configuration value.
    Set {
        /// The configuration key, e.g. `aws:region`.
        key: String,

        /// The value to store.
        value: String,
    },

    /// Unset a configuration value. Removing a missing key is a no-op.
    Rm {
        /// The configuration key to remove.
        key: String,
    },
}

/// Stack snapshot subcommands.
#[derive(Subcommand, Debug)]
pub enum StackCommands {
    /// Initialize an empty deployment snapshot for the stack.
    Init {
        /// Overwrite an existing snapshot.
        #[arg(short, long)]
        force: bool,
    },

    /// Import a deployment into the stack.
    ///
    /// A deployment exported with `vellum stack export` and hand-edited to
    /// correct inconsistencies can be re-imported with this command. Reads
    /// from standard in unless --file is given.
    Import {
        /// A filename to read the deployment from.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Force the import to occur, even if apparent errors are discovered
        /// beforehand (not recommended).
        #[arg(short, long)]
        force: bool,
    },

    /// Export the stack's deployment to stdout or a file.
    Export {
        /// A filename to write the deployment to.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

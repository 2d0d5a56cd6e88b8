//! Output formatting for CLI commands.

use colored::Colorize;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

use crate::config::StackConfig;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Configuration row for table display.
#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a stack's configuration for display, in deterministic key
    /// order.
    #[must_use]
    pub fn format_config(&self, config: &StackConfig) -> String {
        match self.format {
            OutputFormat::Json => {
                let map: BTreeMap<&str, &str> =
                    config.iter().map(|(k, v)| (k.as_str(), v)).collect();
                serde_json::to_string_pretty(&map).unwrap_or_default()
            }
            OutputFormat::Text => {
                if config.is_empty() {
                    return format!("no configuration for stack '{}'\n", config.stack());
                }
                let rows: Vec<ConfigRow> = config
                    .iter()
                    .map(|(k, v)| ConfigRow {
                        key: k.to_string(),
                        value: v.to_string(),
                    })
                    .collect();
                let mut out = Table::new(rows).to_string();
                out.push('\n');
                out
            }
        }
    }

    /// Formats a warning line.
    #[must_use]
    pub fn format_warning(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::json!({"level": "warning", "message": message}).to_string()
            }
            OutputFormat::Text => format!("{} {message}", "warning:".yellow()),
        }
    }

    /// Formats a success line.
    #[must_use]
    pub fn format_success(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::json!({"level": "info", "message": message}).to_string()
            }
            OutputFormat::Text => format!("{} {message}", "✓".green()),
        }
    }
}

//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{FitArgs, MinimizeArgs};

/// Slope - Gradient descent experimentation CLI
#[derive(Parser)]
#[command(name = "slope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Maximum number of trajectory rows shown in tables and CSV
    #[arg(long, default_value = "20", global = true)]
    pub rows: usize,

    /// Log optimizer progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output settings shared by every command.
    pub fn display(&self) -> Display {
        Display {
            format: self.format,
            rows: self.rows,
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Minimize (or maximize) a built-in test function
    Minimize(MinimizeArgs),

    /// Fit a linear model to CSV data by minibatch SGD
    Fit(FitArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the final point)
    Minimal,
}

/// Output format plus table sizing.
#[derive(Debug, Clone, Copy)]
pub struct Display {
    pub format: OutputFormat,
    pub rows: usize,
}

//! CLI commands for gtl
//!
//! This module contains all subcommand implementations for the gtl CLI.

pub mod check;
pub mod headers;
pub mod layout;
pub mod range;

pub use check::{CheckCommand, CheckOutput};
pub use headers::{HeadersCommand, HeadersOutput};
pub use layout::{LayoutCommand, LayoutOutput};
pub use range::{RangeCommand, RangeOutput};

use clap::Subcommand;
use ganttline_core::{Task, ViewConfig};

use crate::error::CliResult;
use crate::output::{OutputFormat, render};

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute bar positions, dependencies and warnings
    Layout(LayoutCommand),
    /// Show the date window and its columns
    Range(RangeCommand),
    /// Render the calendar header texts
    Headers(HeadersCommand),
    /// Report schedule problems
    Check(CheckCommand),
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Layout(_) => "layout",
            Command::Range(_) => "range",
            Command::Headers(_) => "headers",
            Command::Check(_) => "check",
        }
    }

    /// Execute the command and render its result.
    ///
    /// # Arguments
    ///
    /// * `tasks` - Task list read from the input
    /// * `config` - Effective view configuration
    /// * `format` - Output format
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the command fails or its output cannot be
    /// serialized.
    pub fn execute(
        &self,
        tasks: &[Task],
        config: &ViewConfig,
        format: OutputFormat,
    ) -> CliResult<String> {
        match self {
            Command::Layout(cmd) => render(&cmd.execute(tasks, config)?, format),
            Command::Range(cmd) => render(&cmd.execute(tasks, config)?, format),
            Command::Headers(cmd) => render(&cmd.execute(tasks, config)?, format),
            Command::Check(cmd) => render(&cmd.execute(tasks, config)?, format),
        }
    }
}

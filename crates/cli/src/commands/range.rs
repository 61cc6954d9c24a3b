//! Range command for printing the timeline window
//!
//! Implements `gtl range`: the first and last bucket boundary of the
//! visible tasks and, optionally, every boundary in between.

use chrono::NaiveDateTime;
use clap::Args;
use ganttline_core::{Task, ViewConfig, compute_layout};
use serde::Serialize;

use crate::error::CliResult;

/// Show the date window and its columns
#[derive(Debug, Args)]
pub struct RangeCommand {
    /// List every column boundary in text output
    #[arg(long)]
    pub list: bool,
}

/// Result of the range command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOutput {
    pub view_mode: &'static str,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub columns: usize,
    pub svg_width: f64,
    /// Boundaries in display order
    pub dates: Vec<NaiveDateTime>,
    #[serde(skip)]
    pub list: bool,
}

impl std::fmt::Display for RangeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} .. {} ({} columns, {}px)",
            self.view_mode,
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M"),
            self.columns,
            self.svg_width
        )?;
        if self.list {
            for date in &self.dates {
                write!(f, "\n  {}", date.format("%Y-%m-%d %H:%M"))?;
            }
        }
        Ok(())
    }
}

impl RangeCommand {
    /// Execute the range command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Layout` if no visible task has dates or the
    /// configuration is invalid.
    pub fn execute(&self, tasks: &[Task], config: &ViewConfig) -> CliResult<RangeOutput> {
        let snapshot = compute_layout(tasks, config)?;
        let grid = snapshot.grid();

        Ok(RangeOutput {
            view_mode: config.view_mode.as_str(),
            start: grid.start(),
            end: grid.end(),
            columns: grid.columns(),
            svg_width: grid.total_width(),
            dates: snapshot.dates().to_vec(),
            list: self.list,
        })
    }
}

//! Output formatting for gtl
//!
//! Every command result is printable two ways: as pretty JSON for other
//! programs, or as aligned text tables for people.

use clap::ValueEnum;
use ganttline_core::TaskLayout;
use serde::Serialize;
use std::fmt::Display;

use crate::error::{CliError, CliResult};

/// Maximum width for the id column before truncation
const MAX_ID_WIDTH: usize = 24;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render a command result in `format`.
///
/// # Errors
///
/// Returns `CliError::Output` if JSON serialization fails.
pub fn render<T: Serialize + Display>(value: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(CliError::Output),
        OutputFormat::Text => Ok(value.to_string()),
    }
}

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}

/// Lay out `rows` under `headers` with every column padded to its widest cell
pub fn format_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; N]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let separator = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![line(headers), separator];
    for row in rows {
        lines.push(line(row.each_ref().map(String::as_str)));
    }
    lines.join("\n")
}

/// Format placed tasks into an aligned table string.
///
/// Produces output in the format:
/// ```text
/// ID      Level  Type  Row  X1      X2      Y     [C]
/// ------  -----  ----  ---  ------  ------  ----  ---
/// design  1      task  1    60.0    240.0   70.0  [C]
/// ```
///
/// The [C] column marks tasks on the critical path.
pub fn format_task_table(tasks: &[TaskLayout]) -> String {
    if tasks.is_empty() {
        return "No visible tasks.".to_string();
    }

    let rows: Vec<[String; 8]> = tasks
        .iter()
        .map(|task| {
            [
                truncate(&task.id, MAX_ID_WIDTH),
                task.level.to_string(),
                task.task_type.as_str().to_string(),
                task.row.to_string(),
                format!("{:.1}", task.coordinates.x1),
                format!("{:.1}", task.coordinates.x2),
                format!("{:.1}", task.coordinates.y),
                format_critical(task.critical).to_string(),
            ]
        })
        .collect();

    format_table(["ID", "Level", "Type", "Row", "X1", "X2", "Y", "[C]"], &rows)
}

fn format_critical(critical: bool) -> &'static str {
    if critical { "[C]" } else { "" }
}

//! Layout command for printing the full layout of a task list
//!
//! Implements `gtl layout`: runs the whole pipeline and prints the placed
//! bars, resolved dependencies, critical path and warnings.

use chrono::NaiveDate;
use clap::Args;
use ganttline_core::{LayoutReport, Task, ViewConfig, compute_layout, scroll_x_for_date};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::format_task_table;

/// Compute bar positions and dependencies
#[derive(Debug, Args)]
pub struct LayoutCommand {
    /// Only print rows of this comparison level
    #[arg(long)]
    pub level: Option<u32>,

    /// Also report the horizontal scroll offset that brings this date into view
    #[arg(long)]
    pub scroll_to: Option<NaiveDate>,
}

/// Result of the layout command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    #[serde(flatten)]
    pub report: LayoutReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
}

impl std::fmt::Display for LayoutOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let report = &self.report;
        let dimensions = &report.dimensions;
        writeln!(
            f,
            "{} view{}: {} columns of {}px ({}px), {} visible tasks",
            report.view_mode,
            if report.rtl { " (right to left)" } else { "" },
            dimensions.columns,
            dimensions.column_width,
            dimensions.svg_width,
            report.tasks.len()
        )?;
        writeln!(f)?;
        write!(f, "{}", format_task_table(&report.tasks))?;

        if !report.dependencies.is_empty() {
            writeln!(f, "\n\nDependencies:")?;
            for dependency in &report.dependencies {
                write!(
                    f,
                    "\n  {} -> {} (level {})",
                    dependency.source_id, dependency.task_id, dependency.level
                )?;
                if dependency.margin.is_some_and(|margin| margin.needs_detour) {
                    write!(f, " detour")?;
                }
                if dependency.critical {
                    write!(f, " [C]")?;
                }
            }
        }

        if !report.critical_path.is_empty() {
            write!(f, "\n\nCritical path:")?;
            for (level, ids) in &report.critical_path {
                write!(f, "\n  level {level}: {}", ids.join(" -> "))?;
            }
        }

        if !report.warnings.is_empty() {
            write!(f, "\n\nWarnings:")?;
            for warning in &report.warnings {
                write!(f, "\n  - {warning}")?;
            }
        }

        if let Some(scroll_x) = self.scroll_x {
            write!(f, "\n\nScroll offset: {scroll_x:.1}px")?;
        }

        Ok(())
    }
}

impl LayoutCommand {
    /// Execute the layout command.
    ///
    /// # Arguments
    ///
    /// * `tasks` - Task list to lay out
    /// * `config` - Effective view configuration
    ///
    /// # Errors
    ///
    /// Returns `CliError::Layout` if the engine rejects the input.
    pub fn execute(&self, tasks: &[Task], config: &ViewConfig) -> CliResult<LayoutOutput> {
        let snapshot = compute_layout(tasks, config)?;
        let mut report = snapshot.report();

        if let Some(level) = self.level {
            report.tasks.retain(|task| task.level == level);
            report.dependencies.retain(|dependency| dependency.level == level);
            report.critical_path.retain(|path_level, _| *path_level == level);
        }

        let scroll_x = self
            .scroll_to
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|date| scroll_x_for_date(snapshot.grid(), date, config.rtl));

        Ok(LayoutOutput { report, scroll_x })
    }
}

//! Check command for reporting schedule problems
//!
//! Implements `gtl check`: runs every diagnostic regardless of the
//! configuration and lists the warnings together with the critical path.

use clap::Args;
use ganttline_core::{Task, ViewConfig, Warning, compute_layout};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{CliError, CliResult};

/// Report dependency, cycle and out-of-parent problems
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Fail with a non-zero exit code when any warning is found
    #[arg(long)]
    pub strict: bool,
}

/// Result of the check command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub warnings: Vec<Warning>,
    pub critical_path: BTreeMap<u32, Vec<String>>,
}

impl std::fmt::Display for CheckOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.warnings.is_empty() {
            write!(f, "No warnings.")?;
        } else {
            write!(f, "{} warning(s):", self.warnings.len())?;
            for warning in &self.warnings {
                write!(f, "\n  [{}] {warning}", warning.as_str())?;
            }
        }

        for (level, ids) in &self.critical_path {
            write!(f, "\nCritical path on level {level}: {}", ids.join(" -> "))?;
        }
        Ok(())
    }
}

impl CheckCommand {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Layout` if the engine rejects the input, and
    /// `CliError::WarningsFound` in strict mode when anything was reported.
    pub fn execute(&self, tasks: &[Task], config: &ViewConfig) -> CliResult<CheckOutput> {
        let config = config.clone().with_all_diagnostics();
        let report = compute_layout(tasks, &config)?.report();

        if self.strict && !report.warnings.is_empty() {
            for warning in &report.warnings {
                warn!("{warning}");
            }
            return Err(CliError::WarningsFound {
                count: report.warnings.len(),
            });
        }

        Ok(CheckOutput {
            warnings: report.warnings,
            critical_path: report.critical_path,
        })
    }
}

//! Task list input

use ganttline_core::Task;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Read the task list from `path`, or from standard input when `None`.
///
/// # Errors
///
/// Returns `CliError::Read`/`CliError::Stdin` when the input cannot be read
/// and `CliError::Json` when it is not a JSON array of tasks.
pub fn read_tasks(path: Option<&Path>) -> CliResult<Vec<Task>> {
    let contents = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Stdin)?;
            buffer
        }
    };

    let tasks = parse_tasks(&contents)?;
    debug!(count = tasks.len(), "Read task list");
    Ok(tasks)
}

/// Parse a JSON array of task records.
///
/// Each record is decoded on its own. One that is not a valid task (no
/// dates, comparison level 0, wrong field types) is skipped with a warning
/// and the rest of the list is kept.
///
/// # Errors
///
/// Returns `CliError::Json` when `contents` is not a JSON array.
pub fn parse_tasks(contents: &str) -> CliResult<Vec<Task>> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(contents).map_err(|source| CliError::Json {
            what: "task list",
            source,
        })?;

    let mut tasks = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!(position, error = %e, "Skipping malformed task record"),
        }
    }
    Ok(tasks)
}

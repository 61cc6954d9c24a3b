use ganttline_core::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `gtl` binary
#[derive(Error, Debug)]
pub enum CliError {
    /// The engine rejected the input or configuration
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Error reading an input file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error reading the task list from standard input
    #[error("Failed to read tasks from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    /// Input that is not valid JSON for the expected shape
    #[error("Invalid {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Error serializing command output
    #[error("Failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),

    /// `check --strict` found warnings
    #[error("{count} warning(s) found")]
    WarningsFound { count: usize },
}

impl CliError {
    /// Message including every underlying cause
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

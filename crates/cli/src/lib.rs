//! ganttline CLI Library
//!
//! This library exposes the CLI commands for use in integration tests.
//! The binary is in `main.rs` and uses this library.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use commands::*;
pub use config::{ConfigOverrides, GANTTLINE_LOCALE_ENV, load_view_config, resolve_locale};
pub use error::{CliError, CliResult};
pub use input::{parse_tasks, read_tasks};
pub use output::OutputFormat;

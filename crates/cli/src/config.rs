//! View configuration for the CLI
//!
//! Settings are layered: built-in defaults, then a JSON config file, then
//! command-line flags. The config file is the one given with `--config`, or
//! `<config_dir>/ganttline/config.json` when that exists.

use clap::Args;
use ganttline_core::{ViewConfig, ViewMode};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Environment variable consulted for the header locale
pub const GANTTLINE_LOCALE_ENV: &str = "GANTTLINE_LOCALE";

/// Flags that override individual configuration fields
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Column granularity (hour, quarter-day, half-day, day, two-days, week, month, quarter-year, year)
    #[arg(long, global = true)]
    pub view_mode: Option<ViewMode>,

    /// Locale for header text (can also be set via GANTTLINE_LOCALE env var)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Lay the timeline out right to left
    #[arg(long, global = true)]
    pub rtl: bool,

    /// Leading columns before the earliest task
    #[arg(long, global = true)]
    pub pre_steps: Option<u32>,

    /// Enable dependency warnings, critical path and out-of-parent checks
    #[arg(long, global = true)]
    pub diagnostics: bool,
}

impl ConfigOverrides {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, mut config: ViewConfig) -> ViewConfig {
        if let Some(view_mode) = self.view_mode {
            config.view_mode = view_mode;
        }
        if let Some(locale) = resolve_locale(self.locale.clone()) {
            config.locale = locale;
        }
        if self.rtl {
            config.rtl = true;
        }
        if let Some(pre_steps) = self.pre_steps {
            config.pre_steps_count = pre_steps;
        }
        if self.diagnostics {
            config = config.with_all_diagnostics();
        }
        config
    }
}

/// Get the locale from the command line or the environment.
///
/// Priority:
/// 1. Command line --locale argument
/// 2. GANTTLINE_LOCALE environment variable (if non-empty)
///
/// Returns `None` when neither is set, leaving the configured locale alone.
pub fn resolve_locale(cli_locale: Option<String>) -> Option<String> {
    if let Some(locale) = cli_locale {
        return Some(locale);
    }

    match std::env::var(GANTTLINE_LOCALE_ENV) {
        Ok(locale) if !locale.is_empty() => Some(locale),
        _ => None,
    }
}

/// Location of the per-user config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ganttline").join("config.json"))
}

/// Build the effective configuration.
///
/// An explicit `path` must exist. Without one, the default config file is
/// read when present and skipped otherwise.
///
/// # Errors
///
/// Returns `CliError::Read` or `CliError::Json` for an unreadable config
/// file and `CliError::Layout` when the result does not validate.
pub fn load_view_config(path: Option<&Path>, overrides: &ConfigOverrides) -> CliResult<ViewConfig> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|candidate| candidate.is_file()),
    };

    let base = match file {
        Some(file) => {
            debug!(path = %file.display(), "Reading view configuration");
            read_config_file(&file)?
        }
        None => ViewConfig::default(),
    };

    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> CliResult<ViewConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

/// Parse a (possibly partial) configuration object
pub fn parse_config(contents: &str) -> CliResult<ViewConfig> {
    serde_json::from_str(contents).map_err(|source| CliError::Json {
        what: "configuration",
        source,
    })
}

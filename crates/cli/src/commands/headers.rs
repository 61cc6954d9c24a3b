//! Headers command for printing calendar header texts
//!
//! Implements `gtl headers`: the top and bottom header text of every
//! column, formatted for the configured locale.

use chrono::NaiveDateTime;
use clap::Args;
use ganttline_core::{
    ChronoFormatter, DateSetup, HeaderCell, MonthFormat, Task, ViewConfig, compute_layout,
    header_cells,
};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::format_table;

/// Render the calendar header texts
#[derive(Debug, Args)]
pub struct HeadersCommand {
    /// Use abbreviated month names regardless of the configuration
    #[arg(long)]
    pub short_month: bool,
}

/// Result of the headers command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersOutput {
    pub view_mode: &'static str,
    pub locale: String,
    pub cells: Vec<HeaderCell>,
}

impl std::fmt::Display for HeadersOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} headers ({})", self.view_mode, self.locale)?;
        writeln!(f)?;

        let rows: Vec<[String; 3]> = self
            .cells
            .iter()
            .map(|cell| {
                [
                    format_date(cell.date),
                    cell.top.clone(),
                    cell.bottom.clone(),
                ]
            })
            .collect();
        write!(f, "{}", format_table(["Column", "Top", "Bottom"], &rows))
    }
}

fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

impl HeadersCommand {
    /// Execute the headers command.
    ///
    /// Formatting failures never surface here; cells fall back to plain
    /// numbers and English month names instead.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Layout` if the timeline cannot be computed.
    pub fn execute(&self, tasks: &[Task], config: &ViewConfig) -> CliResult<HeadersOutput> {
        let snapshot = compute_layout(tasks, config)?;
        let formatter = ChronoFormatter;
        let setup = DateSetup::from_config(config, &formatter);
        let month_format = if self.short_month {
            MonthFormat::Short
        } else {
            config.month_calendar_format
        };

        Ok(HeadersOutput {
            view_mode: config.view_mode.as_str(),
            locale: config.locale.clone(),
            cells: header_cells(snapshot.dates(), config.view_mode, &setup, month_format),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ganttline_core::ViewMode;

    fn tasks() -> Vec<Task> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        vec![Task::new("a", "A", start, end)]
    }

    #[test]
    fn test_month_headers() {
        let config = ViewConfig::default().with_view_mode(ViewMode::Month);
        let output = HeadersCommand { short_month: false }
            .execute(&tasks(), &config)
            .unwrap();

        let bottoms: Vec<&str> = output.cells.iter().map(|c| c.bottom.as_str()).collect();
        assert_eq!(bottoms[..4], ["December", "January", "February", "March"]);
        assert_eq!(output.cells[0].top, "2023");
        assert_eq!(output.cells[1].top, "2024");
    }

    #[test]
    fn test_short_month_flag() {
        let config = ViewConfig::default().with_view_mode(ViewMode::Month);
        let output = HeadersCommand { short_month: true }
            .execute(&tasks(), &config)
            .unwrap();

        assert_eq!(output.cells[1].bottom, "Jan");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let mut config = ViewConfig::default().with_view_mode(ViewMode::Month);
        config.locale = "xx-YY".to_string();
        let output = HeadersCommand { short_month: false }
            .execute(&tasks(), &config)
            .unwrap();

        assert_eq!(output.cells[1].bottom, "January");
    }

    #[test]
    fn test_headers_text_output() {
        let config = ViewConfig::default().with_view_mode(ViewMode::Month);
        let text = HeadersCommand { short_month: false }
            .execute(&tasks(), &config)
            .unwrap()
            .to_string();

        assert!(text.starts_with("Month headers (en-GB)"));
        assert!(text.contains("2024-01-01 00:00  2024  January"));
    }
}

//! View configuration
//!
//! Every field defaults to the value the browser component uses, so a
//! partial JSON object (or none at all) yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::view_mode::ViewMode;

/// Length of month names in headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFormat {
    #[default]
    Long,
    Short,
}

/// strftime patterns handed to the date formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateFormats {
    /// Day text in the top header of sub-day views
    pub day_top_header: String,
    /// Day text in the bottom header of day views
    pub day_bottom_header: String,
    /// Hour text in the bottom header of sub-day views
    pub hour_bottom_header: String,
    pub month_long: String,
    pub month_short: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            day_top_header: "%-d".to_string(),
            day_bottom_header: "%a, %-d".to_string(),
            hour_bottom_header: "%H".to_string(),
            month_long: "%B".to_string(),
            month_short: "%b".to_string(),
        }
    }
}

/// Everything besides the task list that shapes a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    pub view_mode: ViewMode,
    /// Leading columns before the earliest task
    pub pre_steps_count: u32,
    pub column_width: f64,
    /// Height of one comparison level inside a row
    pub row_height: f64,
    /// Bar height as a percentage of `row_height`
    pub bar_fill: f64,
    /// Number of overlaid tracks per row
    pub comparison_levels: u32,
    pub rtl: bool,
    /// Horizontal run of an arrow before it turns
    pub arrow_indent: f64,
    /// Drag snapping granularity in milliseconds
    pub time_step: i64,
    pub locale: String,
    pub month_calendar_format: MonthFormat,
    pub date_formats: DateFormats,
    pub show_dependency_warnings: bool,
    pub show_critical_path: bool,
    pub show_child_out_of_parent_warnings: bool,
    /// Honor `hideChildren` on projects
    pub collapse_enabled: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Day,
            pre_steps_count: 1,
            column_width: 60.0,
            row_height: 50.0,
            bar_fill: 60.0,
            comparison_levels: 1,
            rtl: false,
            arrow_indent: 20.0,
            time_step: 300_000,
            locale: "en-GB".to_string(),
            month_calendar_format: MonthFormat::Long,
            date_formats: DateFormats::default(),
            show_dependency_warnings: false,
            show_critical_path: false,
            show_child_out_of_parent_warnings: false,
            collapse_enabled: true,
        }
    }
}

impl ViewConfig {
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_comparison_levels(mut self, levels: u32) -> Self {
        self.comparison_levels = levels;
        self
    }

    /// Turn on dependency warnings, critical path and out-of-parent checks
    pub fn with_all_diagnostics(mut self) -> Self {
        self.show_dependency_warnings = true;
        self.show_critical_path = true;
        self.show_child_out_of_parent_warnings = true;
        self
    }

    /// Reject configurations that cannot produce a layout.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> LayoutResult<()> {
        let positive = [
            ("columnWidth", self.column_width),
            ("rowHeight", self.row_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be a positive number")));
            }
        }

        if !(self.bar_fill.is_finite() && self.bar_fill > 0.0 && self.bar_fill <= 100.0) {
            return Err(invalid("barFill must be within (0, 100]".to_string()));
        }
        if self.comparison_levels == 0 {
            return Err(invalid("comparisonLevels must be at least 1".to_string()));
        }
        if !(self.arrow_indent.is_finite() && self.arrow_indent >= 0.0) {
            return Err(invalid("arrowIndent must not be negative".to_string()));
        }
        if self.time_step <= 0 {
            return Err(invalid("timeStep must be positive".to_string()));
        }

        Ok(())
    }

    /// Pixel sizes derived from this configuration
    pub fn geometry(&self) -> Geometry {
        let task_height = self.row_height * self.bar_fill / 100.0;
        Geometry {
            column_width: self.column_width,
            row_height: self.row_height,
            full_row_height: self.row_height * f64::from(self.comparison_levels),
            task_height,
            task_half_height: (task_height / 2.0).round(),
            rtl: self.rtl,
        }
    }
}

fn invalid(message: String) -> LayoutError {
    LayoutError::InvalidConfig { message }
}

/// Pixel sizes shared by coordinate mapping and arrow routing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub column_width: f64,
    /// Height of one comparison level
    pub row_height: f64,
    /// Height of a whole row, all levels stacked
    pub full_row_height: f64,
    pub task_height: f64,
    pub task_half_height: f64,
    pub rtl: bool,
}

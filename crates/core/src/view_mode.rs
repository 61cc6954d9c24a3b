//! Timeline granularity.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LayoutError;

/// Column granularity of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ViewMode {
    Hour,
    /// Six-hour columns.
    QuarterDay,
    /// Twelve-hour columns.
    HalfDay,
    #[default]
    Day,
    TwoDays,
    Week,
    Month,
    /// Three-month columns.
    QuarterYear,
    Year,
}

/// Natural advance between two bucket boundaries
///
/// Month-based steps are calendar-aware, everything else is a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hours(i64),
    Days(i64),
    Months(u32),
}

/// Boundary that range start and end are rounded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Hour,
    Day,
    /// Monday 00:00, independent of locale.
    Week,
    Month,
    Quarter,
    Year,
}

impl ViewMode {
    /// Every supported mode, finest first
    pub const ALL: [ViewMode; 9] = [
        ViewMode::Hour,
        ViewMode::QuarterDay,
        ViewMode::HalfDay,
        ViewMode::Day,
        ViewMode::TwoDays,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::QuarterYear,
        ViewMode::Year,
    ];

    /// Returns the canonical name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Hour => "Hour",
            ViewMode::QuarterDay => "QuarterDay",
            ViewMode::HalfDay => "HalfDay",
            ViewMode::Day => "Day",
            ViewMode::TwoDays => "TwoDays",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::QuarterYear => "QuarterYear",
            ViewMode::Year => "Year",
        }
    }

    /// Distance between two consecutive bucket boundaries
    pub fn step(&self) -> Step {
        match self {
            ViewMode::Hour => Step::Hours(1),
            ViewMode::QuarterDay => Step::Hours(6),
            ViewMode::HalfDay => Step::Hours(12),
            ViewMode::Day => Step::Days(1),
            ViewMode::TwoDays => Step::Days(2),
            ViewMode::Week => Step::Days(7),
            ViewMode::Month => Step::Months(1),
            ViewMode::QuarterYear => Step::Months(3),
            ViewMode::Year => Step::Months(12),
        }
    }

    /// Boundary the timeline window is aligned to
    pub fn boundary(&self) -> Boundary {
        match self {
            ViewMode::Hour => Boundary::Hour,
            ViewMode::QuarterDay | ViewMode::HalfDay | ViewMode::Day | ViewMode::TwoDays => {
                Boundary::Day
            }
            ViewMode::Week => Boundary::Week,
            ViewMode::Month => Boundary::Month,
            ViewMode::QuarterYear => Boundary::Quarter,
            ViewMode::Year => Boundary::Year,
        }
    }

    /// Whether bottom headers show hours
    pub fn is_sub_day(&self) -> bool {
        matches!(
            self,
            ViewMode::Hour | ViewMode::QuarterDay | ViewMode::HalfDay
        )
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = LayoutError;

    /// Parses a mode name, ignoring case, spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "hour" => Ok(ViewMode::Hour),
            "quarterday" => Ok(ViewMode::QuarterDay),
            "halfday" => Ok(ViewMode::HalfDay),
            "day" => Ok(ViewMode::Day),
            "twodays" => Ok(ViewMode::TwoDays),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "quarteryear" | "quarter" => Ok(ViewMode::QuarterYear),
            "year" => Ok(ViewMode::Year),
            _ => Err(LayoutError::UnsupportedViewMode {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ViewMode {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewMode> for String {
    fn from(mode: ViewMode) -> Self {
        mode.as_str().to_string()
    }
}

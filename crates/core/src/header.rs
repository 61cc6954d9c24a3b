//! Calendar header text
//!
//! The top row names the wider period (year, month), the bottom row the
//! bucket itself. Localized text comes from an injected [`DateFormatter`];
//! when it fails the text falls back to a fixed English rendering, so a
//! bad locale never blanks the header.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Locale, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt::Write;
use tracing::trace;

use crate::config::{DateFormats, MonthFormat, ViewConfig};
use crate::error::FormatError;
use crate::view_mode::ViewMode;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Locale-aware date formatting supplied by the caller
pub trait DateFormatter {
    /// Render `date` with a strftime `pattern` in `locale`.
    ///
    /// # Errors
    ///
    /// Returns a `FormatError` when the locale or the pattern is unusable.
    fn format(
        &self,
        date: NaiveDateTime,
        pattern: &str,
        locale: &str,
    ) -> Result<String, FormatError>;
}

/// chrono strftime with its bundled locale data
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoFormatter;

impl DateFormatter for ChronoFormatter {
    fn format(
        &self,
        date: NaiveDateTime,
        pattern: &str,
        locale: &str,
    ) -> Result<String, FormatError> {
        let chrono_locale = Locale::try_from(locale.replace('-', "_").as_str()).map_err(|_| {
            FormatError::UnknownLocale {
                locale: locale.to_string(),
            }
        })?;

        let invalid = || FormatError::InvalidPattern {
            pattern: pattern.to_string(),
        };
        if StrftimeItems::new(pattern).any(|item| item == Item::Error) {
            return Err(invalid());
        }

        let mut text = String::new();
        write!(text, "{}", date.and_utc().format_localized(pattern, chrono_locale))
            .map_err(|_| invalid())?;
        Ok(text)
    }
}

/// Everything header rendering needs besides the date
#[derive(Clone, Copy)]
pub struct DateSetup<'a> {
    pub locale: &'a str,
    pub date_formats: &'a DateFormats,
    pub formatter: &'a dyn DateFormatter,
}

impl<'a> DateSetup<'a> {
    pub fn new(
        locale: &'a str,
        date_formats: &'a DateFormats,
        formatter: &'a dyn DateFormatter,
    ) -> Self {
        Self {
            locale,
            date_formats,
            formatter,
        }
    }

    /// Setup drawing locale and patterns from `config`
    pub fn from_config(config: &'a ViewConfig, formatter: &'a dyn DateFormatter) -> Self {
        Self::new(&config.locale, &config.date_formats, formatter)
    }

    fn format_or(&self, date: NaiveDateTime, pattern: &str, fallback: impl FnOnce() -> String) -> String {
        match self.formatter.format(date, pattern, self.locale) {
            Ok(text) => text,
            Err(err) => {
                trace!("Header formatting fell back: {}", err);
                fallback()
            }
        }
    }

    fn day_text(&self, date: NaiveDateTime) -> String {
        self.format_or(date, &self.date_formats.day_top_header, || {
            date.day().to_string()
        })
    }

    fn month_text(&self, date: NaiveDateTime, use_short_month: bool) -> String {
        let pattern = if use_short_month {
            &self.date_formats.month_short
        } else {
            &self.date_formats.month_long
        };
        self.format_or(date, pattern, || english_month(date, use_short_month))
    }
}

fn english_month(date: NaiveDateTime, short: bool) -> String {
    let name = MONTHS[date.month0() as usize];
    if short {
        name[..3].to_string()
    } else {
        name.to_string()
    }
}

fn quarter(date: NaiveDateTime) -> u32 {
    date.month0() / 3 + 1
}

/// Text above a group of columns
pub fn render_top_header_text(
    date: NaiveDateTime,
    view_mode: ViewMode,
    setup: &DateSetup<'_>,
    use_short_month: bool,
) -> String {
    match view_mode {
        ViewMode::Year | ViewMode::Month => date.year().to_string(),
        ViewMode::QuarterYear => format!("Q{} {}", quarter(date), date.year()),
        ViewMode::Week => format!(
            "{}, {}",
            setup.month_text(date, use_short_month),
            date.year()
        ),
        ViewMode::TwoDays | ViewMode::Day => setup.month_text(date, use_short_month),
        ViewMode::QuarterDay | ViewMode::HalfDay | ViewMode::Hour => format!(
            "{} {}",
            setup.day_text(date),
            setup.month_text(date, use_short_month)
        ),
    }
}

/// Text of a single column
pub fn render_bottom_header_text(
    date: NaiveDateTime,
    view_mode: ViewMode,
    setup: &DateSetup<'_>,
    use_short_month: bool,
) -> String {
    match view_mode {
        ViewMode::Year => date.year().to_string(),
        ViewMode::QuarterYear => format!("Q{}", quarter(date)),
        ViewMode::Month => setup.month_text(date, use_short_month),
        ViewMode::Week => format!("W{}", date.iso_week().week()),
        ViewMode::TwoDays | ViewMode::Day => {
            setup.format_or(date, &setup.date_formats.day_bottom_header, || {
                date.day().to_string()
            })
        }
        ViewMode::QuarterDay | ViewMode::HalfDay | ViewMode::Hour => {
            setup.format_or(date, &setup.date_formats.hour_bottom_header, || {
                format!("{:02}", date.hour())
            })
        }
    }
}

/// Both header texts for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub date: NaiveDateTime,
    pub top: String,
    pub bottom: String,
}

/// Header texts for every column opened by `dates` (the last boundary only
/// closes a column)
pub fn header_cells(
    dates: &[NaiveDateTime],
    view_mode: ViewMode,
    setup: &DateSetup<'_>,
    month_format: MonthFormat,
) -> Vec<HeaderCell> {
    let short = month_format == MonthFormat::Short;
    let columns = dates.len().saturating_sub(1);
    dates
        .iter()
        .take(columns)
        .map(|date| HeaderCell {
            date: *date,
            top: render_top_header_text(*date, view_mode, setup, short),
            bottom: render_bottom_header_text(*date, view_mode, setup, short),
        })
        .collect()
}

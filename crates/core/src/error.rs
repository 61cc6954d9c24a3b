use chrono::NaiveDateTime;
use thiserror::Error;

/// Layout error types for ganttline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// No task with a date span was supplied where at least one is required
    #[error("Cannot compute a date range: no tasks with dates were supplied")]
    EmptyInput,

    /// Unrecognized view mode value
    #[error("Unsupported view mode '{value}'")]
    UnsupportedViewMode { value: String },

    /// View configuration that cannot produce a layout
    #[error("Invalid view configuration: {message}")]
    InvalidConfig { message: String },

    /// Calendar arithmetic left the representable date range
    #[error("Date arithmetic overflowed near {date}")]
    DateOverflow { date: NaiveDateTime },
}

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Failure reported by a [`crate::header::DateFormatter`].
///
/// Header rendering recovers from every variant with a fixed fallback text,
/// so these never reach the caller of the header functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Locale identifier the formatter has no data for
    #[error("Unknown locale '{locale}'")]
    UnknownLocale { locale: String },

    /// Pattern the formatter cannot render
    #[error("Invalid date pattern '{pattern}'")]
    InvalidPattern { pattern: String },
}

/// A task record that cannot enter a layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskRecordError {
    /// A dated task type without one of its dates
    #[error("Task '{id}' has no {field} date")]
    MissingDate { id: String, field: &'static str },

    /// Comparison levels are numbered from 1
    #[error("Task '{id}' has comparison level 0; levels start at 1")]
    ZeroComparisonLevel { id: String },

    /// Neither a plain date-time nor an RFC 3339 timestamp
    #[error("Unrecognized timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_input_error_display() {
        let err = LayoutError::EmptyInput;
        assert_eq!(
            err.to_string(),
            "Cannot compute a date range: no tasks with dates were supplied"
        );
    }

    #[test]
    fn test_unsupported_view_mode_error_display() {
        let err = LayoutError::UnsupportedViewMode {
            value: "Fortnight".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported view mode 'Fortnight'");
    }

    #[test]
    fn test_invalid_config_error_display() {
        let err = LayoutError::InvalidConfig {
            message: "columnWidth must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid view configuration: columnWidth must be positive"
        );
    }

    #[test]
    fn test_date_overflow_error_display() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = LayoutError::DateOverflow { date };
        assert_eq!(
            err.to_string(),
            "Date arithmetic overflowed near 2024-01-01 00:00:00"
        );
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::UnknownLocale {
            locale: "xx-YY".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown locale 'xx-YY'");

        let err = FormatError::InvalidPattern {
            pattern: "%Q".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid date pattern '%Q'");
    }

    #[test]
    fn test_task_record_error_display() {
        let err = TaskRecordError::MissingDate {
            id: "b".to_string(),
            field: "start",
        };
        assert_eq!(err.to_string(), "Task 'b' has no start date");

        let err = TaskRecordError::ZeroComparisonLevel {
            id: "a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Task 'a' has comparison level 0; levels start at 1"
        );
    }

    #[test]
    fn test_layout_result_type_alias() {
        let ok_result: LayoutResult<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: LayoutResult<i32> = Err(LayoutError::EmptyInput);
        assert!(err_result.is_err());
    }
}

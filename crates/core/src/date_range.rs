//! Timeline window and bucket boundaries
//!
//! Computes the `[start, end]` window covering every dated task plus the
//! configured leading steps, and expands it into the ordered boundary
//! instants ("seed dates") that delimit the timeline columns.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use tracing::trace;

use crate::error::{LayoutError, LayoutResult};
use crate::models::Task;
use crate::view_mode::{Boundary, Step, ViewMode};

/// Advance `date` by `count` steps (negative counts go backwards).
///
/// Month-based steps follow the calendar, so one `Step::Months(1)` from
/// January 1st lands on February 1st regardless of month length.
///
/// # Errors
///
/// Returns `LayoutError::DateOverflow` if the result is not representable.
pub fn add_steps(date: NaiveDateTime, step: Step, count: i64) -> LayoutResult<NaiveDateTime> {
    let overflow = || LayoutError::DateOverflow { date };

    match step {
        Step::Hours(hours) => hours
            .checked_mul(count)
            .and_then(Duration::try_hours)
            .and_then(|delta| date.checked_add_signed(delta))
            .ok_or_else(overflow),
        Step::Days(days) => days
            .checked_mul(count)
            .and_then(Duration::try_days)
            .and_then(|delta| date.checked_add_signed(delta))
            .ok_or_else(overflow),
        Step::Months(months) => {
            let total = i64::from(months)
                .checked_mul(count)
                .ok_or_else(overflow)?;
            let magnitude = u32::try_from(total.unsigned_abs()).map_err(|_| overflow())?;
            if total >= 0 {
                date.checked_add_months(Months::new(magnitude))
            } else {
                date.checked_sub_months(Months::new(magnitude))
            }
            .ok_or_else(overflow)
        }
    }
}

fn midnight(date: NaiveDate) -> LayoutResult<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .ok_or(LayoutError::DateOverflow {
            date: NaiveDateTime::default(),
        })
}

fn first_of_month(year: i32, month: u32, near: NaiveDateTime) -> LayoutResult<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(LayoutError::DateOverflow { date: near })
        .and_then(midnight)
}

/// Round `date` down to the nearest `boundary`.
pub fn floor_to(date: NaiveDateTime, boundary: Boundary) -> LayoutResult<NaiveDateTime> {
    match boundary {
        Boundary::Hour => date
            .date()
            .and_hms_opt(date.hour(), 0, 0)
            .ok_or(LayoutError::DateOverflow { date }),
        Boundary::Day => midnight(date.date()),
        Boundary::Week => {
            let back = i64::from(date.weekday().num_days_from_monday());
            let day = midnight(date.date())?;
            add_steps(day, Step::Days(1), -back)
        }
        Boundary::Month => first_of_month(date.year(), date.month(), date),
        Boundary::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            first_of_month(date.year(), month, date)
        }
        Boundary::Year => first_of_month(date.year(), 1, date),
    }
}

/// Round `date` up to the nearest `boundary`; boundaries map to themselves.
pub fn ceil_to(date: NaiveDateTime, boundary: Boundary) -> LayoutResult<NaiveDateTime> {
    let floor = floor_to(date, boundary)?;
    if floor == date {
        return Ok(date);
    }
    add_steps(floor, boundary_step(boundary), 1)
}

fn boundary_step(boundary: Boundary) -> Step {
    match boundary {
        Boundary::Hour => Step::Hours(1),
        Boundary::Day => Step::Days(1),
        Boundary::Week => Step::Days(7),
        Boundary::Month => Step::Months(1),
        Boundary::Quarter => Step::Months(3),
        Boundary::Year => Step::Months(12),
    }
}

/// Compute the inclusive timeline window for `tasks`.
///
/// Start is the earliest task start minus `pre_steps` natural steps, rounded
/// down to the view's boundary. End is the latest task end plus one step,
/// rounded up. Empty rows carry no dates and are skipped.
///
/// # Errors
///
/// Returns `LayoutError::EmptyInput` if no task has a date span.
pub fn compute_date_range<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    view_mode: ViewMode,
    pre_steps: u32,
) -> LayoutResult<(NaiveDateTime, NaiveDateTime)> {
    let (earliest, latest) = tasks
        .into_iter()
        .filter(|task| !task.is_empty_row())
        .map(|task| (task.start.min(task.end), task.start.max(task.end)))
        .reduce(|(earliest, latest), (start, end)| (earliest.min(start), latest.max(end)))
        .ok_or(LayoutError::EmptyInput)?;

    let step = view_mode.step();
    let boundary = view_mode.boundary();

    let start = floor_to(add_steps(earliest, step, -i64::from(pre_steps))?, boundary)?;
    let end = ceil_to(add_steps(latest, step, 1)?, boundary)?;

    trace!("Date range for {}: {} .. {}", view_mode, start, end);
    Ok((start, end))
}

/// Expand `[start, end]` into ordered bucket boundaries.
///
/// Emits `start`, then keeps advancing by the view's step until a boundary
/// at or past `end` has been emitted. Always returns at least two
/// boundaries, i.e. at least one column.
pub fn seed_dates(
    start: NaiveDateTime,
    end: NaiveDateTime,
    view_mode: ViewMode,
) -> LayoutResult<Vec<NaiveDateTime>> {
    let step = view_mode.step();
    let mut dates = vec![start];
    let mut current = start;

    while current < end {
        current = add_steps(current, step, 1)?;
        dates.push(current);
    }

    if dates.len() < 2 {
        dates.push(add_steps(start, step, 1)?);
    }

    trace!("Seeded {} boundaries for {}", dates.len(), view_mode);
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn task(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Task {
        Task::new(id, id, start, end)
    }

    #[test]
    fn test_day_range_scenario() {
        let tasks = vec![task("1", at(2024, 1, 1, 0), at(2024, 1, 3, 0))];

        let (start, end) = compute_date_range(&tasks, ViewMode::Day, 1).unwrap();
        assert_eq!(start, at(2023, 12, 31, 0));
        assert_eq!(end, at(2024, 1, 4, 0));

        let dates = seed_dates(start, end, ViewMode::Day).unwrap();
        assert_eq!(
            dates,
            vec![
                at(2023, 12, 31, 0),
                at(2024, 1, 1, 0),
                at(2024, 1, 2, 0),
                at(2024, 1, 3, 0),
                at(2024, 1, 4, 0),
            ]
        );
    }

    #[test]
    fn test_empty_task_list_fails() {
        let result = compute_date_range(&Vec::<Task>::new(), ViewMode::Day, 1);
        assert_eq!(result, Err(LayoutError::EmptyInput));
    }

    #[test]
    fn test_only_empty_rows_fails() {
        let tasks = vec![Task::empty("gap", "")];
        let result = compute_date_range(&tasks, ViewMode::Week, 1);
        assert_eq!(result, Err(LayoutError::EmptyInput));
    }

    #[test]
    fn test_empty_rows_do_not_widen_range() {
        let tasks = vec![
            Task::empty("gap", ""),
            task("1", at(2024, 5, 10, 0), at(2024, 5, 11, 0)),
        ];
        let (start, _) = compute_date_range(&tasks, ViewMode::Day, 0).unwrap();
        assert_eq!(start, at(2024, 5, 10, 0));
    }

    #[test]
    fn test_week_range_starts_on_monday() {
        // 2024-01-10 is a Wednesday
        let tasks = vec![task("1", at(2024, 1, 10, 9), at(2024, 1, 12, 0))];
        let (start, end) = compute_date_range(&tasks, ViewMode::Week, 1).unwrap();

        assert_eq!(start, at(2024, 1, 1, 0));
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        assert_eq!(end.weekday(), chrono::Weekday::Mon);
        assert!(end >= at(2024, 1, 19, 0));
    }

    #[test]
    fn test_month_range_uses_calendar_months() {
        let tasks = vec![task("1", at(2024, 1, 31, 0), at(2024, 2, 15, 0))];
        let (start, end) = compute_date_range(&tasks, ViewMode::Month, 1).unwrap();
        assert_eq!(start, at(2023, 12, 1, 0));
        assert_eq!(end, at(2024, 4, 1, 0));

        let dates = seed_dates(start, end, ViewMode::Month).unwrap();
        assert_eq!(
            dates,
            vec![
                at(2023, 12, 1, 0),
                at(2024, 1, 1, 0),
                at(2024, 2, 1, 0),
                at(2024, 3, 1, 0),
                at(2024, 4, 1, 0),
            ]
        );
    }

    #[test]
    fn test_quarter_year_range_aligns_to_quarters() {
        let tasks = vec![task("1", at(2024, 5, 20, 0), at(2024, 8, 2, 0))];
        let (start, end) = compute_date_range(&tasks, ViewMode::QuarterYear, 1).unwrap();
        assert_eq!(start, at(2024, 1, 1, 0));
        assert_eq!(end, at(2025, 1, 1, 0));

        let dates = seed_dates(start, end, ViewMode::QuarterYear).unwrap();
        assert_eq!(dates.len(), 5);
        assert!(dates.iter().all(|d| d.month0() % 3 == 0 && d.day() == 1));
    }

    #[test]
    fn test_year_range() {
        let tasks = vec![task("1", at(2024, 6, 1, 0), at(2024, 7, 1, 0))];
        let (start, end) = compute_date_range(&tasks, ViewMode::Year, 1).unwrap();
        assert_eq!(start, at(2023, 1, 1, 0));
        assert_eq!(end, at(2026, 1, 1, 0));
    }

    #[test]
    fn test_sub_day_modes_step_in_hours() {
        let tasks = vec![task("1", at(2024, 3, 1, 7), at(2024, 3, 1, 13))];

        let (start, end) = compute_date_range(&tasks, ViewMode::QuarterDay, 1).unwrap();
        assert_eq!(start, at(2024, 3, 1, 0));
        let dates = seed_dates(start, end, ViewMode::QuarterDay).unwrap();
        assert_eq!(dates[1] - dates[0], Duration::hours(6));

        let (start, end) = compute_date_range(&tasks, ViewMode::Hour, 2).unwrap();
        assert_eq!(start, at(2024, 3, 1, 5));
        assert_eq!(end, at(2024, 3, 1, 14));
        let dates = seed_dates(start, end, ViewMode::Hour).unwrap();
        assert_eq!(dates.len(), 10);
    }

    #[test]
    fn test_two_days_step() {
        let tasks = vec![task("1", at(2024, 3, 1, 0), at(2024, 3, 4, 0))];
        let (start, end) = compute_date_range(&tasks, ViewMode::TwoDays, 1).unwrap();
        let dates = seed_dates(start, end, ViewMode::TwoDays).unwrap();

        assert_eq!(dates[0], at(2024, 2, 28, 0));
        assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(2)));
        assert!(*dates.last().unwrap() >= end);
    }

    #[test]
    fn test_seed_dates_always_has_two_boundaries() {
        let start = at(2024, 1, 1, 0);
        let dates = seed_dates(start, start, ViewMode::Day).unwrap();
        assert_eq!(dates, vec![start, at(2024, 1, 2, 0)]);
    }

    #[test]
    fn test_seed_dates_are_strictly_increasing_for_every_mode() {
        let tasks = vec![
            task("1", at(2023, 11, 28, 3), at(2024, 2, 2, 0)),
            Task::milestone("m", "m", at(2024, 1, 15, 12)),
        ];
        for mode in ViewMode::ALL {
            let (start, end) = compute_date_range(&tasks, mode, 1).unwrap();
            let dates = seed_dates(start, end, mode).unwrap();
            assert!(dates.len() >= 2, "{mode}");
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "{mode}");
            assert!(*dates.last().unwrap() >= end, "{mode}");
        }
    }

    #[test]
    fn test_floor_and_ceil() {
        let date = at(2024, 8, 14, 15);
        assert_eq!(floor_to(date, Boundary::Hour).unwrap(), date);
        assert_eq!(floor_to(date, Boundary::Day).unwrap(), at(2024, 8, 14, 0));
        assert_eq!(floor_to(date, Boundary::Week).unwrap(), at(2024, 8, 12, 0));
        assert_eq!(floor_to(date, Boundary::Quarter).unwrap(), at(2024, 7, 1, 0));
        assert_eq!(ceil_to(date, Boundary::Day).unwrap(), at(2024, 8, 15, 0));
        assert_eq!(ceil_to(date, Boundary::Month).unwrap(), at(2024, 9, 1, 0));
        assert_eq!(
            ceil_to(at(2024, 9, 1, 0), Boundary::Month).unwrap(),
            at(2024, 9, 1, 0)
        );
    }

    #[test]
    fn test_add_steps_backwards_across_year() {
        let date = at(2024, 1, 1, 0);
        assert_eq!(
            add_steps(date, Step::Months(3), -1).unwrap(),
            at(2023, 10, 1, 0)
        );
        assert_eq!(add_steps(date, Step::Days(7), -2).unwrap(), at(2023, 12, 18, 0));
    }
}

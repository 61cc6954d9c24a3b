//! Drag edits
//!
//! A drag never mutates the task it starts from. Each pointer frame turns
//! into a [`DragAction`], and [`apply_drag`] answers with the record the host
//! should hand back to its task list, or `None` when nothing changes.

use chrono::{Duration, NaiveDateTime};
use tracing::trace;

use crate::coordinates::{TaskCoordinates, TimelineGrid};
use crate::error::{LayoutError, LayoutResult};
use crate::models::{Task, TaskType};

/// What the pointer is dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragAction {
    /// Whole bar, shifted by the delta
    Move(Duration),
    /// Start handle
    Start(Duration),
    /// End handle
    End(Duration),
    /// Progress handle, at pointer position `pointer_x` inside `bar`
    Progress {
        pointer_x: f64,
        bar: TaskCoordinates,
        rtl: bool,
    },
}

impl DragAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragAction::Move(_) => "move",
            DragAction::Start(_) => "start",
            DragAction::End(_) => "end",
            DragAction::Progress { .. } => "progress",
        }
    }
}

/// Round `delta` to the nearest multiple of `time_step_ms` (halves round up).
pub fn snap_to_step(delta: Duration, time_step_ms: i64) -> Duration {
    if time_step_ms <= 0 {
        return delta;
    }
    let ms = i128::from(delta.num_milliseconds());
    let step = i128::from(time_step_ms);
    let floor = ms.div_euclid(step) * step;
    let snapped = if (ms - floor) * 2 >= step {
        floor + step
    } else {
        floor
    };
    saturating_milliseconds(snapped)
}

/// Milliseconds as a duration, pinned to the representable range
fn saturating_milliseconds(ms: i128) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(if ms < 0 { Duration::MIN } else { Duration::MAX })
}

/// Apply one drag step to `task`.
///
/// Time deltas are snapped to `time_step_ms` first. Start and end handles
/// stop at the opposite edge; milestones move as a whole whichever handle
/// is dragged.
///
/// # Returns
///
/// The changed record, or `None` for disabled and empty tasks and for drags
/// that leave the task as it was.
///
/// # Errors
///
/// Returns `LayoutError::DateOverflow` if the shifted date is not representable.
pub fn apply_drag(task: &Task, action: DragAction, time_step_ms: i64) -> LayoutResult<Option<Task>> {
    if task.is_disabled() || task.is_empty_row() {
        return Ok(None);
    }

    let mut changed = task.clone();
    match action {
        DragAction::Progress {
            pointer_x,
            bar,
            rtl,
        } => {
            if task.task_type == TaskType::Milestone || bar.width <= 0.0 {
                return Ok(None);
            }
            let offset = if rtl {
                bar.right() - pointer_x
            } else {
                pointer_x - bar.left()
            };
            let ratio = (offset / bar.width).clamp(0.0, 1.0);
            changed.progress = (ratio * 100.0).round() / 100.0;
        }
        DragAction::Move(delta)
        | DragAction::Start(delta)
        | DragAction::End(delta)
            if task.task_type == TaskType::Milestone =>
        {
            let delta = snap_to_step(delta, time_step_ms);
            changed.start = shift(task.start, delta)?;
            changed.end = shift(task.end, delta)?;
        }
        DragAction::Move(delta) => {
            let delta = snap_to_step(delta, time_step_ms);
            changed.start = shift(task.start, delta)?;
            changed.end = shift(task.end, delta)?;
        }
        DragAction::Start(delta) => {
            let delta = snap_to_step(delta, time_step_ms);
            changed.start = shift(task.start, delta)?.min(task.end);
        }
        DragAction::End(delta) => {
            let delta = snap_to_step(delta, time_step_ms);
            changed.end = shift(task.end, delta)?.max(task.start);
        }
    }

    if changed == *task {
        return Ok(None);
    }
    trace!("Drag {} on {}", action.as_str(), task.key());
    Ok(Some(changed))
}

fn shift(date: NaiveDateTime, delta: Duration) -> LayoutResult<NaiveDateTime> {
    date.checked_add_signed(delta)
        .ok_or(LayoutError::DateOverflow { date })
}

/// Convert a horizontal pointer movement into time.
///
/// Uses the length of the column under `at`, so a pixel covers more time in
/// a 31-day month than in February. In right-to-left layouts moving left
/// goes forward in time.
pub fn pixel_delta_to_duration(dx: f64, grid: &TimelineGrid, at: NaiveDateTime, rtl: bool) -> Duration {
    let column = grid.column_index(at);
    let column_ms = grid
        .column_duration(column)
        .map_or(0, |duration| duration.num_milliseconds());
    let direction = if rtl { -1.0 } else { 1.0 };
    let ms = direction * dx * column_ms as f64 / grid.column_width();
    saturating_milliseconds(ms.round() as i128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    const STEP: i64 = 300_000;

    #[test]
    fn test_snap_to_step() {
        assert_eq!(snap_to_step(Duration::minutes(7), STEP), Duration::minutes(5));
        assert_eq!(snap_to_step(Duration::seconds(450), STEP), Duration::minutes(10));
        assert_eq!(snap_to_step(Duration::minutes(-7), STEP), Duration::minutes(-5));
        assert_eq!(snap_to_step(Duration::minutes(-8), STEP), Duration::minutes(-10));
        assert_eq!(snap_to_step(Duration::minutes(7), 0), Duration::minutes(7));
    }

    #[test]
    fn test_snap_saturates_at_duration_limits() {
        assert_eq!(snap_to_step(Duration::MIN, STEP), Duration::MIN);
        assert_eq!(snap_to_step(Duration::MAX, STEP), Duration::MAX);
    }

    #[test]
    fn test_move_shifts_both_edges() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));
        let moved = apply_drag(&task, DragAction::Move(Duration::hours(25)), STEP)
            .unwrap()
            .unwrap();
        assert_eq!(moved.start, at(3, 1, 0));
        assert_eq!(moved.end, at(5, 1, 0));
        assert_eq!(task.start, at(2, 0, 0));
    }

    #[test]
    fn test_resize_never_crosses() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));

        let start = apply_drag(&task, DragAction::Start(Duration::days(5)), STEP)
            .unwrap()
            .unwrap();
        assert_eq!(start.start, at(4, 0, 0));
        assert_eq!(start.end, at(4, 0, 0));

        let end = apply_drag(&task, DragAction::End(Duration::days(-5)), STEP)
            .unwrap()
            .unwrap();
        assert_eq!(end.end, at(2, 0, 0));
        assert_eq!(end.start, at(2, 0, 0));
    }

    #[test]
    fn test_resize_snaps() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));
        let end = apply_drag(&task, DragAction::End(Duration::minutes(13)), STEP)
            .unwrap()
            .unwrap();
        assert_eq!(end.end, at(4, 0, 15));
    }

    #[test]
    fn test_milestone_moves_whole() {
        let task = Task::milestone("m", "M", at(3, 0, 0));
        let moved = apply_drag(&task, DragAction::End(Duration::hours(2)), STEP)
            .unwrap()
            .unwrap();
        assert_eq!(moved.start, at(3, 2, 0));
        assert_eq!(moved.end, at(3, 2, 0));
    }

    #[test]
    fn test_small_drag_is_no_change() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));
        let result = apply_drag(&task, DragAction::Move(Duration::seconds(60)), STEP).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_disabled_and_empty_ignore_drags() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0)).with_disabled(true);
        assert!(
            apply_drag(&task, DragAction::Move(Duration::days(1)), STEP)
                .unwrap()
                .is_none()
        );
        let empty = Task::empty("gap", "Gap");
        assert!(
            apply_drag(&empty, DragAction::Move(Duration::days(1)), STEP)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_progress_from_pointer() {
        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));
        let bar = TaskCoordinates {
            x1: 100.0,
            x2: 200.0,
            width: 100.0,
            ..Default::default()
        };
        let action = DragAction::Progress {
            pointer_x: 125.0,
            bar,
            rtl: false,
        };
        let changed = apply_drag(&task, action, STEP).unwrap().unwrap();
        assert_eq!(changed.progress, 0.25);

        let mirrored = DragAction::Progress {
            pointer_x: 125.0,
            bar: bar.mirror(300.0),
            rtl: true,
        };
        let changed = apply_drag(&task, mirrored, STEP).unwrap().unwrap();
        assert_eq!(changed.progress, 0.75);

        let beyond = DragAction::Progress {
            pointer_x: 900.0,
            bar,
            rtl: false,
        };
        assert_eq!(apply_drag(&task, beyond, STEP).unwrap().unwrap().progress, 1.0);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let task = Task::new("a", "A", NaiveDateTime::MAX, NaiveDateTime::MAX);
        let result = apply_drag(&task, DragAction::Move(Duration::days(1)), STEP);
        assert!(matches!(result, Err(LayoutError::DateOverflow { .. })));
    }

    #[test]
    fn test_pixel_delta_uses_column_under_pointer() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        ];
        let grid = TimelineGrid::new(&dates, 62.0).unwrap();

        let january = pixel_delta_to_duration(2.0, &grid, at(10, 0, 0), false);
        assert_eq!(january, Duration::days(1));

        let february_at = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let february = pixel_delta_to_duration(62.0, &grid, february_at, false);
        assert_eq!(february, Duration::days(29));

        assert_eq!(
            pixel_delta_to_duration(2.0, &grid, at(10, 0, 0), true),
            Duration::days(-1)
        );
    }

    #[test]
    fn test_huge_pointer_movement_saturates() {
        let dates: Vec<NaiveDateTime> = (1..=3).map(|d| at(d, 0, 0)).collect();
        let grid = TimelineGrid::new(&dates, 60.0).unwrap();

        let backwards = pixel_delta_to_duration(-1e30, &grid, at(1, 12, 0), false);
        assert_eq!(backwards, Duration::MIN);
        assert_eq!(
            pixel_delta_to_duration(1e30, &grid, at(1, 12, 0), false),
            Duration::MAX
        );
        assert_eq!(
            pixel_delta_to_duration(f64::NAN, &grid, at(1, 12, 0), false),
            Duration::zero()
        );

        let task = Task::new("a", "A", at(2, 0, 0), at(4, 0, 0));
        let result = apply_drag(&task, DragAction::Move(backwards), STEP);
        assert!(matches!(result, Err(LayoutError::DateOverflow { .. })));
    }
}

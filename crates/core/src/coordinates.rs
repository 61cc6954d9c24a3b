//! Date-to-pixel mapping
//!
//! [`TimelineGrid`] turns instants into fractional column positions by
//! interpolating between bucket boundaries, so months of 28 and 31 days
//! both fill one column. [`map_coordinates`] then places every visible
//! task bar.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::f64::consts::SQRT_2;
use tracing::debug;

use crate::config::Geometry;
use crate::error::{LayoutError, LayoutResult};
use crate::index::{RowIndex, Slot, TaskIndex};
use crate::models::{Task, TaskType};

/// Bucket boundaries plus the pixel width of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineGrid {
    /// Always increasing, whatever order the caller supplied
    boundaries: Vec<NaiveDateTime>,
    column_width: f64,
}

impl TimelineGrid {
    /// Build a grid from seed dates.
    ///
    /// Accepts increasing boundaries, or decreasing ones as produced for
    /// right-to-left layouts, and stores them increasing.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` when fewer than two boundaries are
    /// given or they are not strictly monotonic.
    pub fn new(dates: &[NaiveDateTime], column_width: f64) -> LayoutResult<Self> {
        if dates.len() < 2 {
            return Err(LayoutError::InvalidConfig {
                message: "timeline needs at least two boundaries".to_string(),
            });
        }

        let mut boundaries = dates.to_vec();
        if boundaries[0] > boundaries[boundaries.len() - 1] {
            boundaries.reverse();
        }
        if boundaries.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(LayoutError::InvalidConfig {
                message: "timeline boundaries must be strictly monotonic".to_string(),
            });
        }

        Ok(Self {
            boundaries,
            column_width,
        })
    }

    /// Number of columns (one fewer than boundaries)
    pub fn columns(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    pub fn boundaries(&self) -> &[NaiveDateTime] {
        &self.boundaries
    }

    pub fn start(&self) -> NaiveDateTime {
        self.boundaries[0]
    }

    pub fn end(&self) -> NaiveDateTime {
        self.boundaries[self.columns()]
    }

    /// Width of the whole timeline in pixels
    pub fn total_width(&self) -> f64 {
        self.columns() as f64 * self.column_width
    }

    /// Column position of `instant`, with the fraction inside the column.
    ///
    /// Clamped to `[0, columns]`: instants before the first boundary map to
    /// 0 and instants after the last map to `columns`.
    pub fn fractional_column(&self, instant: NaiveDateTime) -> f64 {
        let columns = self.columns();
        let at_or_before = self.boundaries.partition_point(|b| *b <= instant);
        if at_or_before == 0 {
            return 0.0;
        }

        let column = (at_or_before - 1).min(columns - 1);
        let left = self.boundaries[column];
        let right = self.boundaries[column + 1];
        let span = (right - left).num_milliseconds() as f64;
        let offset = (instant - left).num_milliseconds() as f64;

        (column as f64 + offset / span).clamp(0.0, columns as f64)
    }

    /// Column containing `instant`, clamped to `[0, columns - 1]`
    pub fn column_index(&self, instant: NaiveDateTime) -> usize {
        (self.fractional_column(instant).floor() as usize).min(self.columns() - 1)
    }

    /// Boundary that opens column `column` (`columns` gives the closing one)
    pub fn date_at_column(&self, column: usize) -> Option<NaiveDateTime> {
        self.boundaries.get(column).copied()
    }

    /// Length of column `column`
    pub fn column_duration(&self, column: usize) -> Option<Duration> {
        let left = self.boundaries.get(column)?;
        let right = self.boundaries.get(column + 1)?;
        Some(*right - *left)
    }

    /// Left-to-right pixel position of `instant`
    pub fn x_for(&self, instant: NaiveDateTime) -> f64 {
        self.column_width * self.fractional_column(instant)
    }
}

/// Pixel geometry of one task bar
///
/// In right-to-left layouts `x1` (start) lies right of `x2` (end); use
/// [`left`](Self::left) and [`right`](Self::right) for the span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCoordinates {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub progress_width: f64,
    pub progress_x: f64,
}

impl TaskCoordinates {
    pub fn left(&self) -> f64 {
        self.x1.min(self.x2)
    }

    pub fn right(&self) -> f64 {
        self.x1.max(self.x2)
    }

    /// Reflect every horizontal value about `total_width`
    pub fn mirror(self, total_width: f64) -> Self {
        Self {
            x1: total_width - self.x1,
            x2: total_width - self.x2,
            progress_x: total_width - self.progress_x - self.progress_width,
            ..self
        }
    }
}

/// Coordinates of every task that has a row, keyed by slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateMap {
    records: Vec<Option<TaskCoordinates>>,
}

impl CoordinateMap {
    pub fn get(&self, slot: Slot) -> Option<&TaskCoordinates> {
        self.records.get(slot.index()).and_then(Option::as_ref)
    }

    pub fn get_by_id(&self, index: &TaskIndex, level: u32, id: &str) -> Option<&TaskCoordinates> {
        index.slot(level, id).and_then(|slot| self.get(slot))
    }

    /// Placed tasks in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &TaskCoordinates)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| record.as_ref().map(|r| (Slot::from_index(i), r)))
    }

    pub fn len(&self) -> usize {
        self.records.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.iter().all(Option::is_none)
    }
}

/// Place every task that has a row.
///
/// # Arguments
///
/// * `index` - Task lookups for the whole list
/// * `rows` - Row numbers of the visible tasks; tasks without one are skipped
/// * `grid` - Timeline the x positions are measured against
/// * `geometry` - Pixel sizes and direction
pub fn map_coordinates(
    index: &TaskIndex,
    rows: &RowIndex,
    grid: &TimelineGrid,
    geometry: &Geometry,
) -> CoordinateMap {
    let mut records = vec![None; index.len()];
    let total_width = grid.total_width();

    for (slot, task) in index.iter() {
        let Some(row) = rows.row(slot) else {
            debug!("No row for {}, skipping coordinates", index.key(slot));
            continue;
        };
        let record = task_coordinates(task, row, grid, geometry);
        records[slot.index()] = Some(if geometry.rtl {
            record.mirror(total_width)
        } else {
            record
        });
    }

    CoordinateMap { records }
}

/// Left-to-right geometry for one task on `row`
fn task_coordinates(
    task: &Task,
    row: usize,
    grid: &TimelineGrid,
    geometry: &Geometry,
) -> TaskCoordinates {
    let row_top = row as f64 * geometry.full_row_height
        + f64::from(task.comparison_level.saturating_sub(1)) * geometry.row_height;

    match task.task_type {
        TaskType::Empty => TaskCoordinates {
            y: row_top,
            ..Default::default()
        },
        TaskType::Milestone => {
            let x = grid.x_for(task.start);
            let width = geometry.task_height / SQRT_2;
            TaskCoordinates {
                x1: x - width / 2.0,
                x2: x + width / 2.0,
                y: row_top + (geometry.row_height - geometry.task_height) / 2.0,
                width,
                height: geometry.task_height,
                progress_width: 0.0,
                progress_x: x - width / 2.0,
            }
        }
        TaskType::Task | TaskType::Project => {
            let x1 = grid.x_for(task.start);
            let x2 = grid.x_for(task.end);
            let width = (x2 - x1).abs();
            TaskCoordinates {
                x1,
                x2,
                y: row_top + (geometry.row_height - geometry.task_height) / 2.0,
                width,
                height: geometry.task_height,
                progress_width: width * task.progress_ratio(),
                progress_x: x1.min(x2),
            }
        }
    }
}

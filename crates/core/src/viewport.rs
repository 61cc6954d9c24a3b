//! Scroll position of the chart area

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::coordinates::TimelineGrid;
use crate::layout::Dimensions;

/// Arrow keys the chart responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKey {
    Up,
    Down,
    Left,
    Right,
}

/// Current scroll offsets plus the limits they are clamped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Width of the whole timeline
    pub svg_width: f64,
    /// Height of every row together
    pub gantt_full_height: f64,
    /// Visible height of the chart area
    pub gantt_height: f64,
    pub column_width: f64,
    pub full_row_height: f64,
}

impl Viewport {
    /// Viewport at the origin for a layout with `dimensions`
    pub fn new(dimensions: &Dimensions, gantt_height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            svg_width: dimensions.svg_width,
            gantt_full_height: dimensions.gantt_full_height,
            gantt_height,
            column_width: dimensions.column_width,
            full_row_height: dimensions.full_row_height,
        }
    }

    pub fn with_scroll_x(mut self, scroll_x: f64) -> Self {
        self.scroll_x = clamp_scroll_x(scroll_x, self.svg_width);
        self
    }

    pub fn with_scroll_y(mut self, scroll_y: f64) -> Self {
        self.scroll_y = clamp_scroll_y(scroll_y, self.gantt_full_height, self.gantt_height);
        self
    }

    /// One row or one column per key press
    pub fn scroll_by_key(self, key: ScrollKey) -> Self {
        match key {
            ScrollKey::Up => self.with_scroll_y(self.scroll_y - self.full_row_height),
            ScrollKey::Down => self.with_scroll_y(self.scroll_y + self.full_row_height),
            ScrollKey::Left => self.with_scroll_x(self.scroll_x - self.column_width),
            ScrollKey::Right => self.with_scroll_x(self.scroll_x + self.column_width),
        }
    }

    /// Wheel movement; with shift held the vertical wheel scrolls sideways
    pub fn scroll_by_wheel(self, delta_x: f64, delta_y: f64, shift: bool) -> Self {
        if shift {
            self.with_scroll_x(self.scroll_x + delta_y)
        } else {
            self.with_scroll_x(self.scroll_x + delta_x)
                .with_scroll_y(self.scroll_y + delta_y)
        }
    }
}

/// Clamp a horizontal offset to `[0, svg_width]`
pub fn clamp_scroll_x(scroll_x: f64, svg_width: f64) -> f64 {
    scroll_x.clamp(0.0, svg_width.max(0.0))
}

/// Clamp a vertical offset to `[0, gantt_full_height - gantt_height]`
pub fn clamp_scroll_y(scroll_y: f64, gantt_full_height: f64, gantt_height: f64) -> f64 {
    scroll_y.clamp(0.0, (gantt_full_height - gantt_height).max(0.0))
}

/// Horizontal offset that brings the column containing `date` to the
/// leading edge.
///
/// Returns `None` when `date` lies outside the timeline. In right-to-left
/// layouts columns are counted from the right.
pub fn scroll_x_for_date(grid: &TimelineGrid, date: NaiveDateTime, rtl: bool) -> Option<f64> {
    if date < grid.start() || date >= grid.end() {
        return None;
    }
    let column = grid.column_index(date);
    let position = if rtl {
        grid.columns() - 1 - column
    } else {
        column
    };
    Some(grid.column_width() * position as f64)
}

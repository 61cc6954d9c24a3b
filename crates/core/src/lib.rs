//! Layout engine for ganttline
//!
//! Turns a flat task list plus a view configuration into a bucketed
//! timeline, per-task pixel coordinates, a dependency graph with its
//! diagnostics, and the ordering of visible rows. Everything is computed
//! synchronously and returned as immutable values.

pub mod change;
pub mod config;
pub mod coordinates;
pub mod date_range;
pub mod error;
pub mod graph;
pub mod header;
pub mod index;
pub mod layout;
pub mod models;
pub mod view_mode;
pub mod viewport;
pub mod visibility;
pub mod warnings;

pub use change::{DragAction, apply_drag, pixel_delta_to_duration, snap_to_step};
pub use config::{DateFormats, Geometry, MonthFormat, ViewConfig};
pub use coordinates::{CoordinateMap, TaskCoordinates, TimelineGrid, map_coordinates};
pub use date_range::{compute_date_range, seed_dates};
pub use error::{FormatError, LayoutError, LayoutResult, TaskRecordError};
pub use graph::{
    CriticalPath, DependencyEdge, DependencyGraph, DependencyMargin, MarginMap,
    build_dependency_graph, compute_margins,
};
pub use header::{
    ChronoFormatter, DateFormatter, DateSetup, HeaderCell, header_cells, render_bottom_header_text,
    render_top_header_text,
};
pub use index::{RowIndex, Slot, TaskIndex};
pub use layout::{
    DependencyLayout, Dimensions, LayoutCache, LayoutReport, LayoutSnapshot, TaskLayout,
    compute_layout, content_hash,
};
pub use models::{Dependency, DependencyTarget, Task, TaskKey, TaskType, parse_timestamp};
pub use view_mode::ViewMode;
pub use viewport::{ScrollKey, Viewport, clamp_scroll_x, clamp_scroll_y, scroll_x_for_date};
pub use visibility::{compute_visible, sort_by_display_order, toggle_hide_children};
pub use warnings::{OutOfParentMap, OutOfParentWarnings, Warning, child_out_of_parent_warnings};

static_assertions::assert_impl_all!(LayoutSnapshot: Send, Sync);
static_assertions::assert_impl_all!(LayoutCache: Send, Sync);
static_assertions::assert_impl_all!(ViewConfig: Send, Sync, Clone);

//! Full layout pipeline
//!
//! [`compute_layout`] derives everything the renderer needs from a task
//! list and a [`ViewConfig`] in one pass and freezes it in a
//! [`LayoutSnapshot`]. Hosts that re-render often keep a [`LayoutCache`],
//! which reuses snapshots for identical input.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::ViewConfig;
use crate::coordinates::{map_coordinates, CoordinateMap, TaskCoordinates, TimelineGrid};
use crate::date_range::{compute_date_range, seed_dates};
use crate::error::{LayoutError, LayoutResult};
use crate::graph::{build_dependency_graph, compute_margins, DependencyGraph, DependencyMargin, MarginMap};
use crate::index::{RowIndex, Slot, TaskIndex};
use crate::models::{DependencyTarget, Task, TaskType};
use crate::visibility::{all_visible, compute_visible};
use crate::warnings::{child_out_of_parent_warnings, out_of_parent_list, OutOfParentMap, Warning};

/// Overall pixel sizes of a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub columns: usize,
    pub column_width: f64,
    /// Width of the whole timeline
    pub svg_width: f64,
    pub row_height: f64,
    pub full_row_height: f64,
    pub task_height: f64,
    pub task_half_height: f64,
    /// Most tasks on any displayed level, hidden ones included
    pub max_level_length: usize,
    pub gantt_full_height: f64,
}

/// Immutable result of one layout pass
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    config: ViewConfig,
    index: TaskIndex,
    visible: Vec<Slot>,
    rows: RowIndex,
    dates: Vec<NaiveDateTime>,
    grid: TimelineGrid,
    coordinates: CoordinateMap,
    graph: DependencyGraph,
    margins: MarginMap,
    warnings: Vec<Warning>,
    out_of_parent: OutOfParentMap,
    dimensions: Dimensions,
}

impl LayoutSnapshot {
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    /// Visible tasks in row order
    pub fn visible(&self) -> impl Iterator<Item = &Task> + '_ {
        self.visible.iter().map(|slot| self.index.task(*slot))
    }

    pub fn visible_slots(&self) -> &[Slot] {
        &self.visible
    }

    pub fn rows(&self) -> &RowIndex {
        &self.rows
    }

    /// Bucket boundaries in display order (decreasing when right-to-left)
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    pub fn grid(&self) -> &TimelineGrid {
        &self.grid
    }

    pub fn coordinates(&self) -> &CoordinateMap {
        &self.coordinates
    }

    /// Coordinates of `id` on `level`, if it is visible
    pub fn bar(&self, level: u32, id: &str) -> Option<&TaskCoordinates> {
        self.coordinates.get_by_id(&self.index, level, id)
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn margins(&self) -> &MarginMap {
        &self.margins
    }

    /// Every warning: dependency problems, cycles and out-of-parent tasks
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn out_of_parent(&self) -> &OutOfParentMap {
        &self.out_of_parent
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Plain serializable view of the snapshot
    pub fn report(&self) -> LayoutReport {
        let tasks = self
            .visible
            .iter()
            .filter_map(|slot| {
                let task = self.index.task(*slot);
                Some(TaskLayout {
                    id: task.id.clone(),
                    level: task.comparison_level,
                    task_type: task.task_type,
                    row: self.rows.row(*slot)?,
                    critical: self.graph.critical_path().contains(*slot),
                    coordinates: *self.coordinates.get(*slot)?,
                })
            })
            .collect();

        let dependencies = self
            .graph
            .edges()
            .iter()
            .enumerate()
            .map(|(id, edge)| {
                let task = self.index.task(edge.dependent);
                DependencyLayout {
                    source_id: self.index.task(edge.source).id.clone(),
                    task_id: task.id.clone(),
                    level: task.comparison_level,
                    source_target: edge.source_target,
                    own_target: edge.own_target,
                    critical: self.graph.critical_path().contains_edge(id),
                    margin: self.margins.get(id).copied(),
                }
            })
            .collect();

        let critical_path = self
            .graph
            .critical_path()
            .levels()
            .map(|(level, path)| {
                let ids = path
                    .iter()
                    .map(|slot| self.index.task(*slot).id.clone())
                    .collect();
                (level, ids)
            })
            .collect();

        LayoutReport {
            view_mode: self.config.view_mode.as_str(),
            rtl: self.config.rtl,
            dates: self.dates.clone(),
            dimensions: self.dimensions,
            tasks,
            dependencies,
            critical_path,
            warnings: self.warnings.clone(),
            out_of_parent: self.out_of_parent.clone(),
        }
    }
}

/// Placed task in a [`LayoutReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLayout {
    pub id: String,
    pub level: u32,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub row: usize,
    pub critical: bool,
    #[serde(flatten)]
    pub coordinates: TaskCoordinates,
}

/// Resolved dependency in a [`LayoutReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLayout {
    pub source_id: String,
    pub task_id: String,
    pub level: u32,
    pub source_target: DependencyTarget,
    pub own_target: DependencyTarget,
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<DependencyMargin>,
}

/// Serializable summary of a [`LayoutSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub view_mode: &'static str,
    pub rtl: bool,
    pub dates: Vec<NaiveDateTime>,
    pub dimensions: Dimensions,
    pub tasks: Vec<TaskLayout>,
    pub dependencies: Vec<DependencyLayout>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub critical_path: BTreeMap<u32, Vec<String>>,
    pub warnings: Vec<Warning>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub out_of_parent: OutOfParentMap,
}

/// Run the whole pipeline for `tasks` under `config`.
///
/// # Errors
///
/// Returns `LayoutError::InvalidConfig` for unusable configurations,
/// `LayoutError::EmptyInput` when no visible task has dates, and
/// `LayoutError::DateOverflow` when the timeline leaves chrono's range.
pub fn compute_layout(tasks: &[Task], config: &ViewConfig) -> LayoutResult<LayoutSnapshot> {
    config.validate()?;
    let geometry = config.geometry();

    let index = TaskIndex::build(tasks);
    let visible = if config.collapse_enabled {
        compute_visible(tasks, &index)
    } else {
        all_visible(tasks, &index)
    };
    let rows = RowIndex::build(&visible, &index);

    let (start, end) = compute_date_range(visible.iter().copied(), config.view_mode, config.pre_steps_count)?;
    let mut dates = seed_dates(start, end, config.view_mode)?;
    let grid = TimelineGrid::new(&dates, config.column_width)?;
    if config.rtl {
        dates.reverse();
    }

    let coordinates = map_coordinates(&index, &rows, &grid, &geometry);
    let graph = build_dependency_graph(
        &index,
        config.show_dependency_warnings,
        config.show_critical_path,
    );
    let margins = compute_margins(
        &graph,
        &index,
        &coordinates,
        config.arrow_indent,
        config.row_height,
        config.rtl,
    );

    let out_of_parent = if config.show_child_out_of_parent_warnings {
        child_out_of_parent_warnings(&index)
    } else {
        OutOfParentMap::new()
    };
    let mut warnings = graph.warnings().to_vec();
    warnings.extend(out_of_parent_list(&out_of_parent));

    let max_level_length = index.max_level_length(config.comparison_levels);
    let dimensions = Dimensions {
        columns: grid.columns(),
        column_width: config.column_width,
        svg_width: grid.total_width(),
        row_height: geometry.row_height,
        full_row_height: geometry.full_row_height,
        task_height: geometry.task_height,
        task_half_height: geometry.task_half_height,
        max_level_length,
        gantt_full_height: max_level_length as f64 * geometry.full_row_height,
    };

    let visible: Vec<Slot> = visible
        .iter()
        .filter_map(|task| index.slot_of(task))
        .collect();

    debug!(
        "Layout: {} tasks, {} visible, {} columns, {} warnings",
        tasks.len(),
        visible.len(),
        dimensions.columns,
        warnings.len()
    );

    Ok(LayoutSnapshot {
        config: config.clone(),
        index,
        visible,
        rows,
        dates,
        grid,
        coordinates,
        graph,
        margins,
        warnings,
        out_of_parent,
        dimensions,
    })
}

const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Memoizes layouts by a SHA-256 digest of the serialized input
#[derive(Debug)]
pub struct LayoutCache {
    entries: IndexMap<[u8; 32], Arc<LayoutSnapshot>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Cache holding at most `capacity` snapshots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Snapshot for `(tasks, config)`, computed on first request.
    ///
    /// # Errors
    ///
    /// Returns whatever [`compute_layout`] returns; failures are not cached.
    pub fn get_or_compute(
        &mut self,
        tasks: &[Task],
        config: &ViewConfig,
    ) -> LayoutResult<Arc<LayoutSnapshot>> {
        let key = content_hash(tasks, config)?;
        if let Some(snapshot) = self.entries.get(&key) {
            self.hits += 1;
            trace!("Layout cache hit");
            return Ok(Arc::clone(snapshot));
        }

        self.misses += 1;
        let snapshot = Arc::new(compute_layout(tasks, config)?);
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// SHA-256 of the JSON encoding of `(tasks, config)`
pub fn content_hash(tasks: &[Task], config: &ViewConfig) -> LayoutResult<[u8; 32]> {
    let bytes = serde_json::to_vec(&(tasks, config)).map_err(|err| LayoutError::InvalidConfig {
        message: format!("input cannot be hashed: {err}"),
    })?;
    Ok(Sha256::digest(&bytes).into())
}

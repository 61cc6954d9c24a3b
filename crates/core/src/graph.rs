//! Dependency graph
//!
//! Edges run from a source task to the task that depends on it and never
//! cross comparison levels. Adjacency is kept as edge ids per slot, so the
//! dependency map (dependent -> sources) and the dependent map
//! (source -> dependents) share one edge list.

use chrono::Duration;
use petgraph::algo::toposort;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::coordinates::CoordinateMap;
use crate::index::{Slot, TaskIndex};
use crate::models::{DependencyTarget, TaskType};
use crate::warnings::Warning;

/// One resolved dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source: Slot,
    pub dependent: Slot,
    pub source_target: DependencyTarget,
    pub own_target: DependencyTarget,
}

/// Longest duration chain per level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalPath {
    paths: BTreeMap<u32, Vec<Slot>>,
    tasks: Vec<bool>,
    edges: Vec<bool>,
}

impl CriticalPath {
    /// Whether the task in `slot` lies on its level's critical path
    pub fn contains(&self, slot: Slot) -> bool {
        self.tasks.get(slot.index()).copied().unwrap_or(false)
    }

    /// Whether edge `edge` joins two consecutive critical tasks
    pub fn contains_edge(&self, edge: usize) -> bool {
        self.edges.get(edge).copied().unwrap_or(false)
    }

    /// Path on `level`, first task first
    pub fn path(&self, level: u32) -> &[Slot] {
        self.paths.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn levels(&self) -> impl Iterator<Item = (u32, &[Slot])> + '_ {
        self.paths.iter().map(|(level, path)| (*level, path.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.values().all(Vec::is_empty)
    }
}

/// Resolved dependencies plus the diagnostics found while resolving them
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: Vec<DependencyEdge>,
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
    critical_path: CriticalPath,
    warnings: Vec<Warning>,
}

impl DependencyGraph {
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn edge(&self, edge: usize) -> &DependencyEdge {
        &self.edges[edge]
    }

    /// Edge ids whose dependent is `slot`
    pub fn dependencies_of(&self, slot: Slot) -> &[usize] {
        self.dependencies
            .get(slot.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edge ids whose source is `slot`
    pub fn dependents_of(&self, slot: Slot) -> &[usize] {
        self.dependents
            .get(slot.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn critical_path(&self) -> &CriticalPath {
        &self.critical_path
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Resolve every dependency in `index`.
///
/// # Arguments
///
/// * `index` - Task lookups; dependencies resolve against the dependent's level
/// * `show_warnings` - Collect dangling-source and timing-conflict warnings
/// * `show_critical_path` - Compute the critical path of every level
///
/// # Returns
///
/// The graph. Dangling sources never produce an edge, whether or not they
/// are reported.
pub fn build_dependency_graph(
    index: &TaskIndex,
    show_warnings: bool,
    show_critical_path: bool,
) -> DependencyGraph {
    let mut graph = DependencyGraph {
        dependencies: vec![Vec::new(); index.len()],
        dependents: vec![Vec::new(); index.len()],
        ..Default::default()
    };

    for (dependent, task) in index.iter() {
        if task.is_empty_row() {
            continue;
        }
        let level = task.comparison_level;

        for dependency in &task.dependencies {
            let source = index
                .slot(level, &dependency.source_id)
                .filter(|slot| !index.task(*slot).is_empty_row());
            let Some(source) = source else {
                debug!(
                    "Dangling dependency {} -> {} on level {}",
                    task.id, dependency.source_id, level
                );
                if show_warnings {
                    graph.warnings.push(Warning::DanglingDependency {
                        task_id: task.id.clone(),
                        source_id: dependency.source_id.clone(),
                        level,
                    });
                }
                continue;
            };

            if show_warnings {
                let margin = task.anchor(dependency.own_target)
                    - index.task(source).anchor(dependency.source_target);
                if margin < Duration::zero() {
                    graph.warnings.push(Warning::TimingConflict {
                        task_id: task.id.clone(),
                        source_id: dependency.source_id.clone(),
                        level,
                        margin_ms: margin.num_milliseconds(),
                    });
                }
            }

            let edge = graph.edges.len();
            graph.edges.push(DependencyEdge {
                source,
                dependent,
                source_target: dependency.source_target,
                own_target: dependency.own_target,
            });
            graph.dependencies[dependent.index()].push(edge);
            graph.dependents[source.index()].push(edge);
        }
    }

    if show_critical_path {
        let (critical_path, cycles) = compute_critical_path(index, &graph);
        graph.critical_path = critical_path;
        graph.warnings.extend(cycles);
    }

    debug!("Dependency graph: {} edges", graph.edges.len());
    graph
}

/// Longest cumulative-duration path ending at a sink, per level.
///
/// Only tasks and milestones take part; project bars summarize their
/// children and empty rows have no duration.
///
/// Ties between equally long chains go to the task that comes first in the
/// caller's list. A level whose dependencies form a cycle gets an empty path
/// and a `CyclicDependency` warning.
fn compute_critical_path(index: &TaskIndex, graph: &DependencyGraph) -> (CriticalPath, Vec<Warning>) {
    let mut result = CriticalPath {
        paths: BTreeMap::new(),
        tasks: vec![false; index.len()],
        edges: vec![false; graph.edges.len()],
    };
    let mut warnings = Vec::new();

    for level in index.levels() {
        let mut level_graph: DiGraph<Slot, usize> = DiGraph::new();
        let mut nodes: Vec<Option<NodeIndex>> = vec![None; index.len()];
        for (slot, task) in index.iter() {
            let schedulable = matches!(task.task_type, TaskType::Task | TaskType::Milestone);
            if task.comparison_level == level && schedulable {
                nodes[slot.index()] = Some(level_graph.add_node(slot));
            }
        }
        for (id, edge) in graph.edges.iter().enumerate() {
            if let (Some(from), Some(to)) = (nodes[edge.source.index()], nodes[edge.dependent.index()])
            {
                level_graph.add_edge(from, to, id);
            }
        }

        let sorted = match toposort(&level_graph, None) {
            Ok(sorted) => sorted,
            Err(cycle) => {
                let task_id = index.task(level_graph[cycle.node_id()]).id.clone();
                warn!("Dependency cycle on level {} through {}", level, task_id);
                warnings.push(Warning::CyclicDependency { level, task_id });
                result.paths.insert(level, Vec::new());
                continue;
            }
        };

        // longest[n] = duration(n) + max(longest[pred]); pred edge kept for the walk back
        let mut longest = vec![0i64; level_graph.node_count()];
        let mut best_edge: Vec<Option<(NodeIndex, usize)>> = vec![None; level_graph.node_count()];
        for &node in &sorted {
            let slot = level_graph[node];
            let mut best: Option<(i64, usize, NodeIndex, usize)> = None;
            for edge in level_graph.edges_directed(node, Direction::Incoming) {
                let pred = edge.source();
                let candidate = (
                    longest[pred.index()],
                    index.global_index(level_graph[pred]),
                    pred,
                    *edge.weight(),
                );
                best = match best {
                    Some(current) if !prefer(candidate.0, candidate.1, current.0, current.1) => {
                        Some(current)
                    }
                    _ => Some(candidate),
                };
            }
            let duration = index.task(slot).duration().num_milliseconds();
            longest[node.index()] = duration + best.map_or(0, |b| b.0);
            best_edge[node.index()] = best.map(|b| (b.2, b.3));
        }

        let end = level_graph
            .node_indices()
            .filter(|node| {
                level_graph
                    .neighbors_directed(*node, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .fold(None::<NodeIndex>, |best, node| match best {
                Some(current)
                    if !prefer(
                        longest[node.index()],
                        index.global_index(level_graph[node]),
                        longest[current.index()],
                        index.global_index(level_graph[current]),
                    ) =>
                {
                    Some(current)
                }
                _ => Some(node),
            });

        let mut path = Vec::new();
        let mut current = end;
        while let Some(node) = current {
            let slot = level_graph[node];
            path.push(slot);
            result.tasks[slot.index()] = true;
            current = best_edge[node.index()].map(|(pred, edge)| {
                result.edges[edge] = true;
                pred
            });
        }
        path.reverse();
        result.paths.insert(level, path);
    }

    (result, warnings)
}

/// Longer wins; equal lengths go to the smaller list position
fn prefer(length: i64, order: usize, other_length: i64, other_order: usize) -> bool {
    length > other_length || (length == other_length && order < other_order)
}

/// Routing requirement of one dependency arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyMargin {
    /// Reading-direction pixel distance from the source anchor to the
    /// dependent anchor
    pub gap: f64,
    /// Gap a direct three-segment arrow needs; `None` when both ends turn
    /// the same way and any gap works
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_gap: Option<f64>,
    /// The arrow has to loop around through the space between rows
    pub needs_detour: bool,
    /// Vertical offset of the detour segment from the source bar center
    pub detour_offset: f64,
    /// Dependent anchor minus source anchor, in milliseconds
    pub time_margin_ms: i64,
}

/// Margins keyed by edge id; `None` when either end has no coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginMap {
    margins: Vec<Option<DependencyMargin>>,
}

impl MarginMap {
    pub fn get(&self, edge: usize) -> Option<&DependencyMargin> {
        self.margins.get(edge).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &DependencyMargin)> + '_ {
        self.margins
            .iter()
            .enumerate()
            .filter_map(|(edge, margin)| margin.as_ref().map(|m| (edge, m)))
    }

    pub fn len(&self) -> usize {
        self.margins.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.margins.iter().all(Option::is_none)
    }
}

/// Compute arrow margins for every edge whose tasks are both placed.
///
/// Must be rerun whenever coordinates change.
///
/// # Arguments
///
/// * `graph` - Resolved edges
/// * `index` - Task lookups, for anchor instants
/// * `coordinates` - Current bar positions
/// * `arrow_indent` - Horizontal run of an arrow before it turns
/// * `row_height` - Height of one comparison level
/// * `rtl` - Whether reading direction runs right to left
pub fn compute_margins(
    graph: &DependencyGraph,
    index: &TaskIndex,
    coordinates: &CoordinateMap,
    arrow_indent: f64,
    row_height: f64,
    rtl: bool,
) -> MarginMap {
    let margins = graph
        .edges
        .iter()
        .map(|edge| {
            let source = coordinates.get(edge.source)?;
            let dependent = coordinates.get(edge.dependent)?;

            let from = anchor_x(source.x1, source.x2, edge.source_target);
            let to = anchor_x(dependent.x1, dependent.x2, edge.own_target);
            let gap = if rtl { from - to } else { to - from };

            let facing = match (edge.source_target, edge.own_target) {
                (DependencyTarget::EndOfTask, DependencyTarget::StartOfTask) => Some(gap),
                (DependencyTarget::StartOfTask, DependencyTarget::EndOfTask) => Some(-gap),
                _ => None,
            };
            let required_gap = facing.map(|_| 2.0 * arrow_indent);
            let needs_detour = facing.is_some_and(|distance| distance < 2.0 * arrow_indent);

            let time_margin = index.task(edge.dependent).anchor(edge.own_target)
                - index.task(edge.source).anchor(edge.source_target);

            Some(DependencyMargin {
                gap,
                required_gap,
                needs_detour,
                detour_offset: row_height / 2.0,
                time_margin_ms: time_margin.num_milliseconds(),
            })
        })
        .collect();

    MarginMap { margins }
}

fn anchor_x(x1: f64, x2: f64, target: DependencyTarget) -> f64 {
    match target {
        DependencyTarget::StartOfTask => x1,
        DependencyTarget::EndOfTask => x2,
    }
}

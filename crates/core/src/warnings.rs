//! Non-fatal diagnostics
//!
//! Problems in the task list never abort a layout. They are collected as
//! [`Warning`] values and returned with the snapshot for the host to show.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::index::{Slot, TaskIndex};

/// A reportable problem with the task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Warning {
    /// A dependency names a task that does not exist on the same level
    DanglingDependency {
        task_id: String,
        source_id: String,
        level: u32,
    },
    /// A task is anchored before the task it depends on
    TimingConflict {
        task_id: String,
        source_id: String,
        level: u32,
        /// Own anchor minus source anchor, in milliseconds (negative)
        margin_ms: i64,
    },
    /// The dependencies on a level form a cycle through `task_id`
    CyclicDependency { level: u32, task_id: String },
    /// A descendant of a collapsed project starts or ends outside it
    OutOfParent {
        level: u32,
        project_id: String,
        task_id: String,
    },
}

impl Warning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Warning::DanglingDependency { .. } => "dangling_dependency",
            Warning::TimingConflict { .. } => "timing_conflict",
            Warning::CyclicDependency { .. } => "cyclic_dependency",
            Warning::OutOfParent { .. } => "out_of_parent",
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Warning::DanglingDependency { level, .. }
            | Warning::TimingConflict { level, .. }
            | Warning::CyclicDependency { level, .. }
            | Warning::OutOfParent { level, .. } => *level,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DanglingDependency {
                task_id,
                source_id,
                level,
            } => write!(
                f,
                "Task '{task_id}' on level {level} depends on unknown task '{source_id}'"
            ),
            Warning::TimingConflict {
                task_id,
                source_id,
                level,
                margin_ms,
            } => write!(
                f,
                "Task '{task_id}' on level {level} is anchored {}ms before '{source_id}'",
                margin_ms.unsigned_abs()
            ),
            Warning::CyclicDependency { level, task_id } => write!(
                f,
                "Dependencies on level {level} form a cycle through '{task_id}'"
            ),
            Warning::OutOfParent {
                level,
                project_id,
                task_id,
            } => write!(
                f,
                "Task '{task_id}' on level {level} lies outside project '{project_id}'"
            ),
        }
    }
}

/// Descendants of one collapsed project that escape its span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutOfParentWarnings {
    /// Offending descendants, in traversal order
    pub task_ids: Vec<String>,
    /// Earliest descendant start before the project start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<NaiveDateTime>,
    /// Latest descendant end after the project end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_end: Option<NaiveDateTime>,
}

/// level -> project id -> offending descendants
pub type OutOfParentMap = BTreeMap<u32, BTreeMap<String, OutOfParentWarnings>>;

/// Check every collapsed project against its structural descendants.
///
/// Each project's subtree is walked with its own visited set, so a
/// malformed parent cycle cannot loop forever.
pub fn child_out_of_parent_warnings(index: &TaskIndex) -> OutOfParentMap {
    let mut result = OutOfParentMap::new();

    for (project_slot, project) in index.iter() {
        if !project.is_collapsed_project() {
            continue;
        }

        let mut visited = vec![false; index.len()];
        visited[project_slot.index()] = true;
        let mut stack: Vec<Slot> = index.children(project_slot).iter().rev().copied().collect();
        let mut found: Option<OutOfParentWarnings> = None;

        while let Some(slot) = stack.pop() {
            if visited[slot.index()] {
                continue;
            }
            visited[slot.index()] = true;
            stack.extend(index.children(slot).iter().rev().copied());

            let task = index.task(slot);
            if task.is_empty_row() || task.is_within(project) {
                continue;
            }

            let entry = found.get_or_insert_with(|| OutOfParentWarnings {
                task_ids: Vec::new(),
                earliest_start: None,
                latest_end: None,
            });
            entry.task_ids.push(task.id.clone());
            if task.start < project.start {
                entry.earliest_start = Some(
                    entry
                        .earliest_start
                        .map_or(task.start, |current| current.min(task.start)),
                );
            }
            if task.end > project.end {
                entry.latest_end = Some(
                    entry
                        .latest_end
                        .map_or(task.end, |current| current.max(task.end)),
                );
            }
        }

        if let Some(warnings) = found {
            debug!(
                "{} descendants outside project {}",
                warnings.task_ids.len(),
                project.key()
            );
            result
                .entry(project.comparison_level)
                .or_default()
                .insert(project.id.clone(), warnings);
        }
    }

    result
}

/// Flatten the out-of-parent map into one warning per offending task
pub fn out_of_parent_list(map: &OutOfParentMap) -> Vec<Warning> {
    map.iter()
        .flat_map(|(level, projects)| {
            projects.iter().flat_map(move |(project_id, warnings)| {
                warnings.task_ids.iter().map(move |task_id| Warning::OutOfParent {
                    level: *level,
                    project_id: project_id.clone(),
                    task_id: task_id.clone(),
                })
            })
        })
        .collect()
}

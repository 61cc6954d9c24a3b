//! Hierarchical visibility and row ordering
//!
//! Collapsed projects hide their descendants. A project's descendants are
//! its structural children; any other task's descendants are the tasks
//! that depend on it. All collapsed projects seed one breadth-first walk,
//! so a task reachable along several paths is visited and removed once.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::index::{Slot, TaskIndex};
use crate::models::{Task, TaskType};

/// Mark every task hidden under a collapsed project.
///
/// # Returns
///
/// A vector indexed by [`Slot`]; `true` means the task is hidden.
pub fn hidden_slots(index: &TaskIndex) -> Vec<bool> {
    let mut hidden = vec![false; index.len()];
    let mut expanded = vec![false; index.len()];
    let mut queue: VecDeque<Slot> = index
        .iter()
        .filter(|(_, task)| task.is_collapsed_project())
        .map(|(slot, _)| slot)
        .collect();

    while let Some(slot) = queue.pop_front() {
        if expanded[slot.index()] {
            continue;
        }
        expanded[slot.index()] = true;

        let next = match index.task(slot).task_type {
            TaskType::Project => index.children(slot),
            _ => index.dependents(slot),
        };
        for &descendant in next {
            if !hidden[descendant.index()] {
                hidden[descendant.index()] = true;
                trace!("Hiding {} under {}", index.key(descendant), index.key(slot));
            }
            if !expanded[descendant.index()] {
                queue.push_back(descendant);
            }
        }
    }

    hidden
}

/// Tasks left visible after collapsing, ordered by `displayOrder`.
///
/// Duplicate records of one `(level, id)` keep only the record the index
/// retained.
pub fn compute_visible<'a>(tasks: &'a [Task], index: &TaskIndex) -> Vec<&'a Task> {
    let hidden = hidden_slots(index);
    let mut visible: Vec<&Task> = tasks
        .iter()
        .enumerate()
        .filter(|(position, task)| match index.slot_of(task) {
            Some(slot) => !hidden[slot.index()] && index.global_index(slot) == *position,
            None => false,
        })
        .map(|(_, task)| task)
        .collect();

    debug!(
        "{} of {} tasks visible",
        visible.len(),
        tasks.len()
    );
    sort_by_display_order(&mut visible);
    visible
}

/// Every task in display order, ignoring `hideChildren`
pub fn all_visible<'a>(tasks: &'a [Task], index: &TaskIndex) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .enumerate()
        .filter(|(position, task)| {
            index
                .slot_of(task)
                .is_some_and(|slot| index.global_index(slot) == *position)
        })
        .map(|(_, task)| task)
        .collect();
    sort_by_display_order(&mut visible);
    visible
}

/// Stable sort by `displayOrder`; tasks without one go last.
pub fn sort_by_display_order(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| {
        let a = a.display_order.unwrap_or(f64::INFINITY);
        let b = b.display_order.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
}

/// Expander click: flip `hideChildren` on a project that carries the flag.
///
/// Returns `None` for tasks without an expander.
pub fn toggle_hide_children(task: &Task) -> Option<Task> {
    if task.task_type != TaskType::Project {
        return None;
    }
    let hide = task.hide_children?;
    Some(task.clone().with_hide_children(!hide))
}

//! Task indexing
//!
//! Assigns every `(level, id)` pair a dense [`Slot`] once, then keeps all
//! per-task lookups as vectors indexed by slot: the task record, its
//! position in the caller's list, and its structural children. Row
//! positions live in a separate [`RowIndex`] because they depend on
//! visibility and ordering, not on the raw list.

use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Task, TaskKey};

/// Dense handle for one `(level, id)` pair within a [`TaskIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot(usize);

impl Slot {
    /// Position of this slot in slot-indexed vectors
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Lookup structures built from the flat task list
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    keys: IndexSet<TaskKey>,
    tasks: Vec<Task>,
    global_order: Vec<usize>,
    children: Vec<Vec<Slot>>,
    dependents: Vec<Vec<Slot>>,
    level_counts: BTreeMap<u32, usize>,
}

impl TaskIndex {
    /// Build the index from `tasks`.
    ///
    /// Duplicate ids on one level are a caller error: the last record wins
    /// and keeps the slot of the first occurrence.
    pub fn build(tasks: &[Task]) -> Self {
        let mut index = Self::default();

        for (position, task) in tasks.iter().enumerate() {
            let (slot, inserted) = index.keys.insert_full(task.key());
            if inserted {
                index.tasks.push(task.clone());
                index.global_order.push(position);
                *index.level_counts.entry(task.comparison_level).or_default() += 1;
            } else {
                debug!("Duplicate task id {}, keeping the later record", task.key());
                index.tasks[slot] = task.clone();
                index.global_order[slot] = position;
            }
        }

        index.children = vec![Vec::new(); index.keys.len()];
        index.dependents = vec![Vec::new(); index.keys.len()];
        for (position, task) in tasks.iter().enumerate() {
            let Some(child) = index.slot_of(task) else {
                continue;
            };
            if index.global_order[child.0] != position {
                continue;
            }
            let level = task.comparison_level;
            if let Some(parent_id) = &task.parent
                && let Some(parent) = index.slot(level, parent_id)
            {
                index.children[parent.0].push(child);
            }
            for dependency in &task.dependencies {
                if let Some(source) = index.slot(level, &dependency.source_id)
                    && !index.dependents[source.0].contains(&child)
                {
                    index.dependents[source.0].push(child);
                }
            }
        }

        index
    }

    /// Number of distinct `(level, id)` pairs
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Slot for `id` on `level`
    pub fn slot(&self, level: u32, id: &str) -> Option<Slot> {
        self.keys.get_index_of(&TaskKey::new(level, id)).map(Slot)
    }

    /// Slot for `task`'s own key
    pub fn slot_of(&self, task: &Task) -> Option<Slot> {
        self.slot(task.comparison_level, &task.id)
    }

    /// Task for `id` on `level`
    pub fn get(&self, level: u32, id: &str) -> Option<&Task> {
        self.slot(level, id).map(|slot| self.task(slot))
    }

    /// Task stored in `slot`
    pub fn task(&self, slot: Slot) -> &Task {
        &self.tasks[slot.0]
    }

    pub fn key(&self, slot: Slot) -> &TaskKey {
        &self.keys[slot.0]
    }

    /// Structural children of `slot`, in input list order
    pub fn children(&self, slot: Slot) -> &[Slot] {
        &self.children[slot.0]
    }

    /// Structural children of the task `parent_id` on `level`
    pub fn children_of(&self, level: u32, parent_id: &str) -> &[Slot] {
        self.slot(level, parent_id)
            .map(|slot| self.children(slot))
            .unwrap_or(&[])
    }

    /// Tasks on the same level that list `slot` as a dependency source
    pub fn dependents(&self, slot: Slot) -> &[Slot] {
        &self.dependents[slot.0]
    }

    /// Position of the task in the caller's list, used for stable tie-breaks
    pub fn global_index(&self, slot: Slot) -> usize {
        self.global_order[slot.0]
    }

    pub fn global_index_of(&self, level: u32, id: &str) -> Option<usize> {
        self.slot(level, id).map(|slot| self.global_index(slot))
    }

    /// Every slot in assignment order
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.keys.len()).map(Slot)
    }

    /// Every task with its slot
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Task)> + '_ {
        self.tasks.iter().enumerate().map(|(i, task)| (Slot(i), task))
    }

    /// Distinct comparison levels, ascending
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.level_counts.keys().copied()
    }

    /// Largest number of tasks on any level up to `comparison_levels`
    pub fn max_level_length(&self, comparison_levels: u32) -> usize {
        self.level_counts
            .range(..=comparison_levels)
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
    }
}

/// Row position of every visible task, counted per comparison level
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    rows: Vec<Option<usize>>,
    per_level: BTreeMap<u32, usize>,
}

impl RowIndex {
    /// Number the rows of `visible` (already filtered and sorted).
    ///
    /// Each level keeps its own counter, so tasks on different levels can
    /// share a row number but never collide within a level.
    pub fn build(visible: &[&Task], index: &TaskIndex) -> Self {
        let mut rows = vec![None; index.len()];
        let mut per_level: BTreeMap<u32, usize> = BTreeMap::new();

        for task in visible {
            let Some(slot) = index.slot_of(task) else {
                continue;
            };
            let counter = per_level.entry(task.comparison_level).or_default();
            rows[slot.0] = Some(*counter);
            *counter += 1;
        }

        Self { rows, per_level }
    }

    /// Row of the task in `slot`; `None` when hidden
    pub fn row(&self, slot: Slot) -> Option<usize> {
        self.rows.get(slot.0).copied().flatten()
    }

    pub fn row_of(&self, index: &TaskIndex, level: u32, id: &str) -> Option<usize> {
        index.slot(level, id).and_then(|slot| self.row(slot))
    }

    /// Rows used on `level`
    pub fn rows_on_level(&self, level: u32) -> usize {
        self.per_level.get(&level).copied().unwrap_or(0)
    }

    /// Rows used by the busiest level
    pub fn row_count(&self) -> usize {
        self.per_level.values().copied().max().unwrap_or(0)
    }
}

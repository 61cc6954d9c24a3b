//! Shared fixtures for the engine integration tests
//!
//! Builds task lists from compact descriptions so each test states only the
//! fields it cares about.

use chrono::{NaiveDate, NaiveDateTime};
use ganttline_core::{Task, TaskIndex, compute_visible};

/// Midnight on the given day of January 2024
pub fn jan(day: u32) -> NaiveDateTime {
    date(2024, 1, day)
}

/// Midnight on an arbitrary date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Task spanning January `start..end`
pub fn task(id: &str, start: u32, end: u32) -> Task {
    Task::new(id, id.to_uppercase(), jan(start), jan(end))
}

/// Ids of the visible tasks, in row order
#[allow(dead_code)]
pub fn visible_ids(tasks: &[Task]) -> Vec<String> {
    let index = TaskIndex::build(tasks);
    compute_visible(tasks, &index)
        .into_iter()
        .map(|task| task.id.clone())
        .collect()
}

/// Small release plan used by several tests: a project with three phases,
/// a milestone and a task on a second comparison level.
#[allow(dead_code)]
pub fn release_plan() -> Vec<Task> {
    vec![
        Task::project("release", "Release", jan(1), jan(12)).with_hide_children(false),
        task("design", 1, 4).with_parent("release").with_progress(1.0),
        task("build", 4, 9)
            .with_parent("release")
            .depends_on("design")
            .with_progress(0.4),
        task("verify", 9, 11).with_parent("release").depends_on("build"),
        Task::milestone("ship", "Ship", jan(11)).depends_on("verify"),
        task("design", 1, 5).with_level(2),
    ]
}

/// The same plan as JSON, the way a host hands it over
#[allow(dead_code)]
pub const RELEASE_PLAN_JSON: &str = r#"[
    {"id": "release", "name": "Release", "type": "project",
     "start": "2024-01-01T00:00:00", "end": "2024-01-12T00:00:00", "hideChildren": false},
    {"id": "design", "name": "DESIGN", "start": "2024-01-01T00:00:00",
     "end": "2024-01-04T00:00:00", "parent": "release", "progress": 1.0},
    {"id": "build", "name": "BUILD", "start": "2024-01-04T00:00:00",
     "end": "2024-01-09T00:00:00", "parent": "release", "progress": 0.4,
     "dependencies": [{"sourceId": "design", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}]},
    {"id": "verify", "name": "VERIFY", "start": "2024-01-09T00:00:00",
     "end": "2024-01-11T00:00:00", "parent": "release",
     "dependencies": [{"sourceId": "build", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}]},
    {"id": "ship", "name": "Ship", "type": "milestone", "start": "2024-01-11T00:00:00",
     "end": "2024-01-11T00:00:00",
     "dependencies": [{"sourceId": "verify", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}]},
    {"id": "design", "name": "DESIGN", "start": "2024-01-01T00:00:00",
     "end": "2024-01-05T00:00:00", "comparisonLevel": 2}
]"#;

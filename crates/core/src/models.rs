//! Data models for ganttline
//!
//! Defines the externally owned task record and its small value types.
//! Field names serialize in camelCase so task lists produced for the
//! browser component load unchanged.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TaskRecordError;

/// Kind of row a task occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Task,
    Milestone,
    Project,
    /// Occupies a row but draws nothing.
    Empty,
}

impl TaskType {
    /// Returns the string representation used in task lists
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Task => "task",
            TaskType::Milestone => "milestone",
            TaskType::Project => "project",
            TaskType::Empty => "empty",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which edge of a bar a dependency arrow attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyTarget {
    StartOfTask,
    EndOfTask,
}

impl DependencyTarget {
    /// Returns the string representation used in task lists
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyTarget::StartOfTask => "startOfTask",
            DependencyTarget::EndOfTask => "endOfTask",
        }
    }
}

impl std::fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependency of one task on another task of the same comparison level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Id of the task this one depends on
    pub source_id: String,

    /// Edge of the source task the arrow leaves from
    pub source_target: DependencyTarget,

    /// Edge of this task the arrow points at
    pub own_target: DependencyTarget,
}

impl Dependency {
    /// Finish-to-start dependency on `source_id`
    pub fn finish_to_start(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source_target: DependencyTarget::EndOfTask,
            own_target: DependencyTarget::StartOfTask,
        }
    }

    /// Dependency with explicit anchors on both tasks
    pub fn new(
        source_id: impl Into<String>,
        source_target: DependencyTarget,
        own_target: DependencyTarget,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_target,
            own_target,
        }
    }
}

/// Identity of a task: its id is only unique within one comparison level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    pub level: u32,
    pub id: String,
}

impl TaskKey {
    pub fn new(level: u32, id: impl Into<String>) -> Self {
        Self {
            level,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.level)
    }
}

fn default_comparison_level() -> u32 {
    1
}

fn is_default_comparison_level(level: &u32) -> bool {
    *level == 1
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// A single row of the chart
///
/// Records are never patched in place by the engine; operations that change
/// a task (drag, expander toggle) return a new record.
///
/// Deserialization goes through a validating record type and rejects ones that
/// cannot be laid out: dated types without their dates and comparison
/// level 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    /// Identifier, unique within its comparison level
    pub id: String,

    /// Display name
    pub name: String,

    /// Row kind
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Start instant (ignored for empty rows)
    pub start: NaiveDateTime,

    /// End instant (equal to start for milestones)
    pub end: NaiveDateTime,

    /// Completion ratio in 0..=1
    #[serde(skip_serializing_if = "is_zero")]
    pub progress: f64,

    /// Overlay track, starting at 1
    #[serde(skip_serializing_if = "is_default_comparison_level")]
    pub comparison_level: u32,

    /// Id of the enclosing project on the same level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Tasks this one depends on, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    /// Draw and row order; absent sorts after every present value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<f64>,

    /// Collapses every descendant of a project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_children: Option<bool>,

    /// Disabled tasks ignore drag changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,
}

/// Task record as it arrives from the host, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    task_type: TaskType,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    end: Option<NaiveDateTime>,
    #[serde(default)]
    progress: f64,
    #[serde(default = "default_comparison_level")]
    comparison_level: u32,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    dependencies: Vec<Dependency>,
    #[serde(default)]
    display_order: Option<f64>,
    #[serde(default)]
    hide_children: Option<bool>,
    #[serde(default)]
    is_disabled: Option<bool>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskRecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        if record.comparison_level == 0 {
            return Err(TaskRecordError::ZeroComparisonLevel { id: record.id });
        }

        let (start, end) = match (record.task_type, record.start, record.end) {
            (_, Some(start), Some(end)) => (start, end),
            (TaskType::Milestone, Some(date), None) => (date, date),
            (TaskType::Empty, start, end) => {
                let date = start.or(end).unwrap_or_default();
                (start.unwrap_or(date), end.unwrap_or(date))
            }
            (_, None, _) => {
                return Err(TaskRecordError::MissingDate {
                    id: record.id,
                    field: "start",
                });
            }
            (_, Some(_), None) => {
                return Err(TaskRecordError::MissingDate {
                    id: record.id,
                    field: "end",
                });
            }
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            task_type: record.task_type,
            start,
            end,
            progress: record.progress,
            comparison_level: record.comparison_level,
            parent: record.parent,
            dependencies: record.dependencies,
            display_order: record.display_order,
            hide_children: record.hide_children,
            is_disabled: record.is_disabled,
        })
    }
}

/// Parse a task timestamp.
///
/// Accepts a plain date-time (`2024-01-01T09:30:00`, fractional seconds
/// allowed), an RFC 3339 timestamp with offset such as the
/// `2024-01-01T00:00:00.000Z` strings browsers produce, or a bare date.
/// Offset timestamps are converted to UTC.
///
/// # Errors
///
/// Returns `TaskRecordError::InvalidTimestamp` for anything else.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TaskRecordError> {
    let value = value.trim();
    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.naive_utc());
    }
    value
        .parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TaskRecordError::InvalidTimestamp {
            value: value.to_string(),
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl Task {
    /// Create a regular task spanning `start..end` on level 1.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_type: TaskType::Task,
            start,
            end,
            progress: 0.0,
            comparison_level: 1,
            parent: None,
            dependencies: Vec::new(),
            display_order: None,
            hide_children: None,
            is_disabled: None,
        }
    }

    /// Create a milestone at `date`.
    pub fn milestone(id: impl Into<String>, name: impl Into<String>, date: NaiveDateTime) -> Self {
        Self::new(id, name, date, date).with_type(TaskType::Milestone)
    }

    /// Create a project spanning `start..end`.
    pub fn project(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self::new(id, name, start, end).with_type(TaskType::Project)
    }

    /// Create an empty placeholder row.
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        let epoch = NaiveDateTime::default();
        Self::new(id, name, epoch, epoch).with_type(TaskType::Empty)
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Place this task on another comparison level
    pub fn with_level(mut self, level: u32) -> Self {
        self.comparison_level = level;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Add a finish-to-start dependency on `source_id`
    pub fn depends_on(self, source_id: impl Into<String>) -> Self {
        self.with_dependency(Dependency::finish_to_start(source_id))
    }

    pub fn with_display_order(mut self, order: f64) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_hide_children(mut self, hide: bool) -> Self {
        self.hide_children = Some(hide);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = Some(disabled);
        self
    }

    /// Key identifying this task within its comparison level
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.comparison_level, self.id.clone())
    }

    /// Whether this row draws nothing
    pub fn is_empty_row(&self) -> bool {
        self.task_type == TaskType::Empty
    }

    /// Whether this is a project whose descendants are collapsed
    pub fn is_collapsed_project(&self) -> bool {
        self.task_type == TaskType::Project && self.hide_children == Some(true)
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled == Some(true)
    }

    /// Length of the task; never negative.
    pub fn duration(&self) -> Duration {
        (self.end - self.start).max(Duration::zero())
    }

    /// Progress clamped to 0..=1
    pub fn progress_ratio(&self) -> f64 {
        if self.progress.is_nan() {
            0.0
        } else {
            self.progress.clamp(0.0, 1.0)
        }
    }

    /// Instant a dependency arrow attaches to
    pub fn anchor(&self, target: DependencyTarget) -> NaiveDateTime {
        match target {
            DependencyTarget::StartOfTask => self.start,
            DependencyTarget::EndOfTask => self.end,
        }
    }

    /// Whether `[start, end]` lies inside `other`'s span
    pub fn is_within(&self, other: &Task) -> bool {
        self.start >= other.start && self.end <= other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_task_type_as_str() {
        assert_eq!(TaskType::Task.as_str(), "task");
        assert_eq!(TaskType::Milestone.as_str(), "milestone");
        assert_eq!(TaskType::Project.as_str(), "project");
        assert_eq!(TaskType::Empty.as_str(), "empty");
    }

    #[test]
    fn test_task_type_display() {
        assert_eq!(format!("{}", TaskType::Project), "project");
    }

    #[test]
    fn test_dependency_target_serialization() {
        let json = serde_json::to_string(&DependencyTarget::StartOfTask).unwrap();
        assert_eq!(json, r#""startOfTask""#);
        let json = serde_json::to_string(&DependencyTarget::EndOfTask).unwrap();
        assert_eq!(json, r#""endOfTask""#);
    }

    #[test]
    fn test_task_deserialize_defaults() {
        let json = r#"{"id":"a","start":"2024-01-01T00:00:00","end":"2024-01-03T00:00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.comparison_level, 1);
        assert_eq!(task.task_type, TaskType::Task);
        assert_eq!(task.display_order, None);
        assert_eq!(task.hide_children, None);
        assert!(task.dependencies.is_empty());
        assert_eq!(task.progress, 0.0);
    }

    #[test]
    fn test_task_deserialize_camel_case_fields() {
        let json = r#"{
            "id": "b",
            "type": "project",
            "start": "2024-01-01T00:00:00",
            "end": "2024-01-05T00:00:00",
            "comparisonLevel": 2,
            "displayOrder": 3,
            "hideChildren": true,
            "dependencies": [
                {"sourceId": "a", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}
            ]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.task_type, TaskType::Project);
        assert_eq!(task.comparison_level, 2);
        assert_eq!(task.display_order, Some(3.0));
        assert!(task.is_collapsed_project());
        assert_eq!(task.dependencies, vec![Dependency::finish_to_start("a")]);
    }

    #[test]
    fn test_empty_task_deserializes_without_dates() {
        let json = r#"{"id":"gap","type":"empty"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.is_empty_row());
    }

    #[test]
    fn test_task_list_with_utc_timestamps() {
        let json = r#"[
            {"id": "a", "start": "2024-01-01T00:00:00.000Z", "end": "2024-01-03T12:30:00.000Z"},
            {"id": "b", "start": "2024-01-03T02:00:00+02:00", "end": "2024-01-04"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();

        assert_eq!(tasks[0].start, at(1));
        assert_eq!(
            tasks[0].end,
            NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap()
        );
        assert_eq!(tasks[1].start, at(3));
        assert_eq!(tasks[1].end, at(4));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert_eq!(
            err,
            TaskRecordError::InvalidTimestamp {
                value: "next tuesday".to_string()
            }
        );
    }

    #[test]
    fn test_dated_task_without_start_is_rejected() {
        let json = r#"{"id":"b","end":"2024-01-03T00:00:00"}"#;
        let err = serde_json::from_str::<Task>(json).unwrap_err();
        assert!(err.to_string().contains("Task 'b' has no start date"), "{err}");

        let json = r#"{"id":"p","type":"project","start":"2024-01-03T00:00:00"}"#;
        let err = serde_json::from_str::<Task>(json).unwrap_err();
        assert!(err.to_string().contains("Task 'p' has no end date"), "{err}");
    }

    #[test]
    fn test_milestone_end_defaults_to_start() {
        let json = r#"{"id":"m","type":"milestone","start":"2024-01-05T00:00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.start, at(5));
        assert_eq!(task.end, at(5));
    }

    #[test]
    fn test_comparison_level_zero_is_rejected() {
        let json = r#"{"id":"a","comparisonLevel":0,"start":"2024-01-01T00:00:00","end":"2024-01-02T00:00:00"}"#;
        let err = serde_json::from_str::<Task>(json).unwrap_err();
        assert!(err.to_string().contains("comparison level 0"), "{err}");
    }

    #[test]
    fn test_serialized_task_reads_back() {
        let task = Task::project("p", "P", at(1), at(9))
            .with_level(2)
            .with_hide_children(true)
            .depends_on("a");
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_task_serialization_skips_defaults() {
        let task = Task::new("a", "A", at(1), at(2));
        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains(r#""type":"task""#));
        assert!(!json.contains("comparisonLevel"));
        assert!(!json.contains("displayOrder"));
        assert!(!json.contains("dependencies"));
    }

    #[test]
    fn test_task_key_includes_level() {
        let task = Task::new("a", "A", at(1), at(2)).with_level(3);
        assert_eq!(task.key(), TaskKey::new(3, "a"));
        assert_eq!(task.key().to_string(), "a@3");
    }

    #[test]
    fn test_milestone_has_zero_duration() {
        let task = Task::milestone("m", "Launch", at(4));
        assert_eq!(task.task_type, TaskType::Milestone);
        assert_eq!(task.start, task.end);
        assert_eq!(task.duration(), Duration::zero());
    }

    #[test]
    fn test_duration_never_negative() {
        let task = Task::new("a", "A", at(5), at(2));
        assert_eq!(task.duration(), Duration::zero());
    }

    #[test]
    fn test_progress_ratio_is_clamped() {
        let base = Task::new("a", "A", at(1), at(2));
        assert_eq!(base.clone().with_progress(1.7).progress_ratio(), 1.0);
        assert_eq!(base.clone().with_progress(-0.2).progress_ratio(), 0.0);
        assert_eq!(base.clone().with_progress(f64::NAN).progress_ratio(), 0.0);
        assert_eq!(base.with_progress(0.25).progress_ratio(), 0.25);
    }

    #[test]
    fn test_collapsed_only_for_projects() {
        let task = Task::new("a", "A", at(1), at(2)).with_hide_children(true);
        assert!(!task.is_collapsed_project());

        let project = Task::project("p", "P", at(1), at(2)).with_hide_children(true);
        assert!(project.is_collapsed_project());
    }

    #[test]
    fn test_anchor_and_within() {
        let parent = Task::project("p", "P", at(1), at(10));
        let inside = Task::new("a", "A", at(2), at(4));
        let outside = Task::new("b", "B", at(8), at(12));

        assert_eq!(inside.anchor(DependencyTarget::StartOfTask), at(2));
        assert_eq!(inside.anchor(DependencyTarget::EndOfTask), at(4));
        assert!(inside.is_within(&parent));
        assert!(!outside.is_within(&parent));
    }
}

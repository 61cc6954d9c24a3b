//! Test infrastructure for integration tests
//!
//! Provides temp-file backed task lists and configurations plus builders for
//! the CLI commands. Each fixture gets its own uniquely named file.

use ganttline_cli::commands::{CheckCommand, HeadersCommand, LayoutCommand, RangeCommand};
use std::path::PathBuf;

/// A JSON file in the temp directory, removed on drop
pub struct TempJson {
    pub path: PathBuf,
}

impl TempJson {
    /// Write `contents` to a fresh file.
    ///
    /// The file name combines process ID, thread ID and a nanosecond
    /// timestamp so parallel tests never collide.
    pub fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "gtl-integration-{}-{}-{:?}-{}.json",
            name,
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, contents).unwrap();
        Self { path }
    }
}

impl Drop for TempJson {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

// =============================================================================
// Task List Fixtures
// =============================================================================

/// Project with two phases and a milestone; `build` overlaps `design`.
#[allow(dead_code)]
pub const PLAN_JSON: &str = r#"[
    {"id": "launch", "name": "Launch", "type": "project",
     "start": "2024-01-01T00:00:00", "end": "2024-01-10T00:00:00", "hideChildren": false},
    {"id": "design", "name": "Design", "parent": "launch",
     "start": "2024-01-01T00:00:00", "end": "2024-01-04T00:00:00"},
    {"id": "build", "name": "Build", "parent": "launch", "progress": 0.5,
     "start": "2024-01-03T00:00:00", "end": "2024-01-08T00:00:00",
     "dependencies": [{"sourceId": "design", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}]},
    {"id": "go", "name": "Go live", "type": "milestone",
     "start": "2024-01-08T00:00:00", "end": "2024-01-08T00:00:00",
     "dependencies": [{"sourceId": "build", "sourceTarget": "endOfTask", "ownTarget": "startOfTask"}]}
]"#;

/// Same plan with the project collapsed and a child running past its end
#[allow(dead_code)]
pub const COLLAPSED_JSON: &str = r#"[
    {"id": "launch", "name": "Launch", "type": "project",
     "start": "2024-01-01T00:00:00", "end": "2024-01-10T00:00:00", "hideChildren": true},
    {"id": "design", "name": "Design", "parent": "launch",
     "start": "2024-01-01T00:00:00", "end": "2024-01-04T00:00:00"},
    {"id": "late", "name": "Late", "parent": "launch",
     "start": "2024-01-08T00:00:00", "end": "2024-01-12T00:00:00"}
]"#;

// =============================================================================
// Command Builder Helpers
// =============================================================================

#[allow(dead_code)]
pub fn layout_cmd() -> LayoutCommand {
    LayoutCommand {
        level: None,
        scroll_to: None,
    }
}

#[allow(dead_code)]
pub fn range_cmd() -> RangeCommand {
    RangeCommand { list: false }
}

#[allow(dead_code)]
pub fn headers_cmd() -> HeadersCommand {
    HeadersCommand { short_month: false }
}

#[allow(dead_code)]
pub fn check_cmd(strict: bool) -> CheckCommand {
    CheckCommand { strict }
}

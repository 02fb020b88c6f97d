use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Final status of a logged task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Failed,
    Cancelled,
}

/// One completed, failed, or cancelled action.
#[derive(Debug, Clone, Serialize)]
pub struct TaskLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Action kind label ("email_send", "email_draft", "calendar_create").
    pub kind: String,
    pub status: TaskStatus,
    pub summary: String,
}

/// In-memory record of past interactions, newest last.
#[derive(Default)]
pub struct TaskLog {
    entries: Mutex<Vec<TaskLogEntry>>,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, kind: &str, status: TaskStatus, summary: String) {
        let entry = TaskLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind: kind.to_string(),
            status,
            summary,
        };
        self.entries.lock().await.push(entry);
    }

    pub async fn entries(&self) -> Vec<TaskLogEntry> {
        self.entries.lock().await.clone()
    }
}

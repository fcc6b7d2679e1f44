//! Team collaboration records: messages, tasks and milestones

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{time, Id};

/// Reference to another user embedded in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Id,
    pub name: String,
}

fn group() -> String {
    "group".to_string()
}

/// Team chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub sender: UserRef,
    pub content: String,
    #[serde(default = "group")]
    pub message_type: String,
    #[serde(deserialize_with = "time::required::deserialize")]
    pub created_at: NaiveDateTime,
}

/// Body of `POST /projects/:id/messages`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub content: String,
    pub message_type: String,
}

impl NewMessage {
    pub fn group(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: group(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" | "done" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub created_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Completed
    }
}

/// Number of tasks that are not completed
pub fn open_task_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_open()).count()
}

/// Body of `POST /projects/:id/tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Id>,
    pub due_date: Option<String>,
}

/// Body of `PUT /tasks/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskUpdate {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "time::required::deserialize")]
    pub due_date: NaiveDateTime,
    #[serde(default)]
    pub status: String,
}

/// Body of `POST /projects/:id/milestones`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
}

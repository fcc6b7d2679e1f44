//! Section-level records: proposals, announcements, course sections and
//! calendar assignments

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{time, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

/// Faculty decision on a pending proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Some(ReviewDecision::Approved),
            "reject" | "rejected" => Some(ReviewDecision::Rejected),
            _ => None,
        }
    }
}

/// Body of `PUT /custom-projects/:id`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Review {
    pub status: ReviewDecision,
}

/// Student-authored project proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomProjectSubmission {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub course: String,
    pub capacity: u32,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: ReviewStatus,
    #[serde(default)]
    pub submitter_name: Option<String>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub created_at: Option<NaiveDateTime>,
}

impl CustomProjectSubmission {
    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }
}

/// Body of `POST /custom-projects`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomProject {
    pub name: String,
    pub description: String,
    pub course: String,
    pub capacity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[serde(other)]
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
        }
    }
}

fn normal() -> Priority {
    Priority::Normal
}

/// Announcement ("user story"), scoped to one project or the whole section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Id,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub story_type: String,
    #[serde(default = "normal")]
    pub priority: Priority,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub project_id: Option<Id>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub created_at: Option<NaiveDateTime>,
}

impl Announcement {
    pub fn is_section_wide(&self) -> bool {
        self.project_id.is_none()
    }

    pub fn scope_label(&self) -> String {
        match (&self.project_id, &self.project_name) {
            (None, _) => "Section-wide".to_string(),
            (Some(_), Some(name)) => name.clone(),
            (Some(id), None) => format!("Project #{id}"),
        }
    }
}

/// Body of `POST /user-stories`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub story_type: String,
    pub priority: Priority,
    pub project_id: Option<Id>,
}

/// Course section students register against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crn {
    pub id: Id,
    pub code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub faculty_name: Option<String>,
}

/// Body of `POST /crns`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCrn {
    pub code: String,
    pub course_name: String,
}

/// Due item shown on the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Id,
    pub title: String,
    #[serde(deserialize_with = "time::required::deserialize")]
    pub due_date: NaiveDateTime,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub project_id: Option<Id>,
}

/// Plain acknowledgement from mutating endpoints
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

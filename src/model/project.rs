//! Projects and team membership

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{time, Id};

/// Server-supplied project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Open,
    Full,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::Full => "full",
        }
    }

    /// Label shown on cards
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "Open",
            ProjectStatus::Full => "Full",
        }
    }
}

/// Faculty member who created the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Student on a project team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub joined_at: Option<NaiveDateTime>,
}

/// Project as listed in the directory or opened in detail.
///
/// The directory listing may omit `team_members`; the detail view always
/// carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub course: String,
    pub capacity: u32,
    #[serde(default)]
    pub current_members: u32,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub creator: Option<Creator>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default, deserialize_with = "time::optional::deserialize")]
    pub created_at: Option<NaiveDateTime>,
}

impl Project {
    /// Server status if supplied, otherwise derived from the head count
    pub fn effective_status(&self) -> ProjectStatus {
        match self.status {
            Some(status) => status,
            None if self.current_members >= self.capacity => ProjectStatus::Full,
            None => ProjectStatus::Open,
        }
    }

    /// Full if either the server says so or no seat is left
    pub fn is_full(&self) -> bool {
        self.effective_status() == ProjectStatus::Full || self.current_members >= self.capacity
    }

    pub fn has_member(&self, user_id: Id) -> bool {
        self.team_members.iter().any(|m| m.id == user_id)
    }

    /// False when the record counts members but does not name them, as
    /// directory listings do. Membership cannot be read from such a record.
    pub fn lists_team(&self) -> bool {
        self.current_members == 0 || !self.team_members.is_empty()
    }

    pub fn creator_name(&self) -> &str {
        self.creator.as_ref().map(|c| c.name.as_str()).unwrap_or("Unknown")
    }

    /// `current/capacity` as shown on cards
    pub fn occupancy(&self) -> String {
        format!("{}/{}", self.current_members, self.capacity)
    }
}

/// Body of `POST /projects` and, with notes, `POST /custom-projects`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub course: String,
    pub capacity: u32,
}

//! Users, profiles and the student directory

use serde::{Deserialize, Serialize};

use super::Id;

/// Portal role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user as returned by `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Course section the student registered under
    #[serde(default)]
    pub crn: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_faculty(&self) -> bool {
        self.role == Role::Faculty
    }
}

/// Full profile from `GET /user/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of `PUT /user/profile`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub biography: String,
    pub skills: String,
    pub interests: String,
}

/// Entry of the student directory (`GET /students`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
}

impl StudentSummary {
    /// Comma-separated skills as individual tags
    pub fn skill_tags(&self) -> Vec<&str> {
        split_tags(self.skills.as_deref())
    }
}

pub(crate) fn split_tags(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Body of `POST /login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response of `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

/// Body of `POST /register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(flatten)]
    pub role_fields: RoleFields,
}

/// Fields that only apply to one role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleFields {
    Student { crn: String },
    Faculty { title: String },
}

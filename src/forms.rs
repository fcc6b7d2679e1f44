//! Form input normalization
//!
//! Raw field values, as typed into a form, turned into request payloads:
//! required fields must be non-blank, numbers are parsed explicitly and
//! blank optional fields become `null`.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::model::*;

/// Input rejected before any request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a date (YYYY-MM-DD), got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("Unknown role '{0}', expected student or faculty")]
    InvalidRole(String),

    #[error("Students must choose a project for announcements")]
    ProjectRequired,
}

pub type FormResult<T> = Result<T, FormError>;

fn required(field: &'static str, value: &str) -> FormResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

/// Blank becomes `None`
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn number<N: std::str::FromStr>(field: &'static str, value: &str) -> FormResult<N> {
    let value = required(field, value)?;
    value
        .parse()
        .map_err(|_| FormError::InvalidNumber { field, value })
}

fn optional_number(field: &'static str, value: &str) -> FormResult<Option<Id>> {
    match optional(value) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| FormError::InvalidNumber { field, value }),
        None => Ok(None),
    }
}

/// Accepts `date` and `datetime-local` input values and passes them on unchanged
fn date(field: &'static str, value: &str) -> FormResult<String> {
    let value = required(field, value)?;
    let valid = NaiveDate::parse_from_str(&value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M").is_ok();
    if valid {
        Ok(value)
    } else {
        Err(FormError::InvalidDate { field, value })
    }
}

fn optional_date(field: &'static str, value: &str) -> FormResult<Option<String>> {
    match optional(value) {
        Some(_) => date(field, value).map(Some),
        None => Ok(None),
    }
}

/// Chat input; blank messages are not sent
pub fn message(content: &str) -> FormResult<NewMessage> {
    Ok(NewMessage::group(required("Message", content)?))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn parse(&self) -> FormResult<Credentials> {
        let username = required("Username", &self.username)?;
        // Passwords are sent as typed
        if self.password.is_empty() {
            return Err(FormError::Missing("Password"));
        }
        Ok(Credentials {
            username,
            password: self.password.clone(),
        })
    }
}

/// Registration with role-conditional fields: students give a section code,
/// faculty give a title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub crn: String,
    pub title: String,
}

impl RegistrationForm {
    pub fn parse(&self) -> FormResult<Registration> {
        let role = Role::parse(&self.role).ok_or_else(|| FormError::InvalidRole(self.role.clone()))?;
        let role_fields = match role {
            Role::Student => RoleFields::Student {
                crn: required("CRN", &self.crn)?,
            },
            Role::Faculty => RoleFields::Faculty {
                title: self.title.trim().to_string(),
            },
        };

        if self.password.is_empty() {
            return Err(FormError::Missing("Password"));
        }

        Ok(Registration {
            username: required("Username", &self.username)?,
            email: required("Email", &self.email)?,
            password: self.password.clone(),
            first_name: required("First name", &self.first_name)?,
            last_name: required("Last name", &self.last_name)?,
            role,
            role_fields,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub biography: String,
    pub skills: String,
    pub interests: String,
}

impl ProfileForm {
    /// Prefill from the loaded profile
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            biography: profile.biography.clone().unwrap_or_default(),
            skills: profile.skills.clone().unwrap_or_default(),
            interests: profile.interests.clone().unwrap_or_default(),
        }
    }

    pub fn parse(&self) -> ProfileUpdate {
        ProfileUpdate {
            biography: self.biography.trim().to_string(),
            skills: self.skills.trim().to_string(),
            interests: self.interests.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub course: String,
    pub capacity: String,
}

impl ProjectForm {
    pub fn parse(&self) -> FormResult<NewProject> {
        Ok(NewProject {
            name: required("Project name", &self.name)?,
            description: self.description.trim().to_string(),
            course: required("Course", &self.course)?,
            capacity: number("Capacity", &self.capacity)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomProjectForm {
    pub name: String,
    pub description: String,
    pub course: String,
    pub capacity: String,
    pub notes: String,
}

impl CustomProjectForm {
    pub fn parse(&self) -> FormResult<NewCustomProject> {
        Ok(NewCustomProject {
            name: required("Project name", &self.name)?,
            description: self.description.trim().to_string(),
            course: required("Course", &self.course)?,
            capacity: number("Capacity", &self.capacity)?,
            notes: optional(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Team member id from the assignee picker, blank for unassigned
    pub assignee_id: String,
    pub due_date: String,
}

impl TaskForm {
    pub fn parse(&self) -> FormResult<NewTask> {
        Ok(NewTask {
            title: required("Task title", &self.title)?,
            description: optional(&self.description),
            assignee_id: optional_number("Assignee", &self.assignee_id)?,
            due_date: optional_date("Due date", &self.due_date)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl MilestoneForm {
    pub fn parse(&self) -> FormResult<NewMilestone> {
        Ok(NewMilestone {
            title: required("Milestone title", &self.title)?,
            description: optional(&self.description),
            due_date: date("Due date", &self.due_date)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    pub story_type: String,
    pub priority: String,
    /// Selected project id, blank for section-wide
    pub project_id: String,
}

impl AnnouncementForm {
    /// Students may only post to a project; faculty may leave it blank for a
    /// section-wide announcement.
    pub fn parse(&self, role: Role) -> FormResult<NewAnnouncement> {
        let project_id = optional_number("Project", &self.project_id)?;
        if role == Role::Student && project_id.is_none() {
            return Err(FormError::ProjectRequired);
        }

        let priority = match self.priority.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            _ => Priority::Normal,
        };

        Ok(NewAnnouncement {
            title: required("Title", &self.title)?,
            content: required("Content", &self.content)?,
            story_type: optional(&self.story_type).unwrap_or_else(|| "announcement".to_string()),
            priority,
            project_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrnForm {
    pub code: String,
    pub course_name: String,
}

impl CrnForm {
    pub fn parse(&self) -> FormResult<NewCrn> {
        Ok(NewCrn {
            code: required("CRN", &self.code)?,
            course_name: required("Course name", &self.course_name)?,
        })
    }
}

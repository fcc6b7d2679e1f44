//! Portal Data Model
//!
//! Typed records exchanged with the portal backend. Every entity is owned by
//! the backend; the client only keeps short-lived copies that are refetched
//! after each mutating action.

mod collab;
mod project;
mod section;
pub mod time;
mod user;

pub use collab::{
    open_task_count, Message, Milestone, NewMessage, NewMilestone, NewTask, Task, TaskStatus,
    TaskUpdate, UserRef,
};
pub use project::{Creator, NewProject, Project, ProjectStatus, TeamMember};
pub use section::{
    Ack, Announcement, Assignment, Crn, CustomProjectSubmission, NewAnnouncement, NewCrn,
    NewCustomProject, Priority, Review, ReviewDecision, ReviewStatus,
};
pub use user::{
    Credentials, LoginResponse, Profile, ProfileUpdate, Registration, Role, RoleFields,
    StudentSummary, User,
};

/// Backend record identifier
pub type Id = i64;

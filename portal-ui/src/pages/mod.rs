//! Page components

mod announcements;
mod auth;
mod calendar;
mod overview;
mod profile;
mod projects;
mod sections;
mod students;

pub use announcements::Announcements;
pub use auth::{Login, Register};
pub use calendar::Calendar;
pub use overview::Overview;
pub use profile::Profile;
pub use projects::{ProjectCard, Projects};
pub use sections::Sections;
pub use students::Students;

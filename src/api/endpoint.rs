//! Backend endpoint catalogue

use crate::model::Id;

/// HTTP method subset used by the portal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every resource the dashboard talks to, relative to the API base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Register,
    Logout,
    Profile,
    Students,
    Projects,
    Project(Id),
    JoinProject(Id),
    LeaveProject(Id),
    Messages(Id),
    Tasks(Id),
    Task(Id),
    Milestones(Id),
    CustomProjects,
    CustomProject(Id),
    UserStories,
    UserStory(Id),
    Crns,
    Crn(Id),
    CalendarAssignments,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/login".into(),
            Endpoint::Register => "/register".into(),
            Endpoint::Logout => "/logout".into(),
            Endpoint::Profile => "/user/profile".into(),
            Endpoint::Students => "/students".into(),
            Endpoint::Projects => "/projects".into(),
            Endpoint::Project(id) => format!("/projects/{id}"),
            Endpoint::JoinProject(id) => format!("/projects/{id}/join"),
            Endpoint::LeaveProject(id) => format!("/projects/{id}/leave"),
            Endpoint::Messages(id) => format!("/projects/{id}/messages"),
            Endpoint::Tasks(id) => format!("/projects/{id}/tasks"),
            Endpoint::Task(id) => format!("/tasks/{id}"),
            Endpoint::Milestones(id) => format!("/projects/{id}/milestones"),
            Endpoint::CustomProjects => "/custom-projects".into(),
            Endpoint::CustomProject(id) => format!("/custom-projects/{id}"),
            Endpoint::UserStories => "/user-stories".into(),
            Endpoint::UserStory(id) => format!("/user-stories/{id}"),
            Endpoint::Crns => "/crns".into(),
            Endpoint::Crn(id) => format!("/crns/{id}"),
            Endpoint::CalendarAssignments => "/calendar/assignments".into(),
        }
    }
}

/// Render `path?k=v&...` with percent-encoded values; empty values are skipped
pub fn with_query(path: &str, query: &[(&str, String)]) -> String {
    let pairs: Vec<String> = query
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();

    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path_and_query: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path_and_query.trim_start_matches('/')
    )
}

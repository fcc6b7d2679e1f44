//! Application state container
//!
//! Everything the dashboard shows lives here. Front-ends read through the
//! accessors; only [`Dashboard`](crate::dashboard::Dashboard) writes.

use crate::calendar::CalendarState;
use crate::membership::{self, Affordance};
use crate::model::*;
use crate::pagination::Paginator;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Login,
    Register,
    Dashboard,
}

/// Dashboard section; exactly one is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Overview,
    Projects,
    Students,
    Announcements,
    Calendar,
    Sections,
    Profile,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Overview,
        View::Projects,
        View::Students,
        View::Announcements,
        View::Calendar,
        View::Sections,
        View::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Projects => "Projects",
            View::Students => "Students",
            View::Announcements => "Announcements",
            View::Calendar => "Calendar",
            View::Sections => "Sections",
            View::Profile => "Profile",
        }
    }
}

/// Tab of the project detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectTab {
    #[default]
    Overview,
    Messages,
    Tasks,
    Milestones,
}

impl ProjectTab {
    pub const ALL: [ProjectTab; 4] = [
        ProjectTab::Overview,
        ProjectTab::Messages,
        ProjectTab::Tasks,
        ProjectTab::Milestones,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectTab::Overview => "Overview",
            ProjectTab::Messages => "Messages",
            ProjectTab::Tasks => "Tasks",
            ProjectTab::Milestones => "Milestones",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "overview" => Some(ProjectTab::Overview),
            "messages" => Some(ProjectTab::Messages),
            "tasks" => Some(ProjectTab::Tasks),
            "milestones" => Some(ProjectTab::Milestones),
            _ => None,
        }
    }
}

/// The project whose detail view is open, with its lazily loaded tabs
#[derive(Debug, Clone, PartialEq)]
pub struct OpenProject {
    pub project: Project,
    pub tab: ProjectTab,
    /// Oldest first
    pub messages: Vec<Message>,
    pub tasks: Vec<Task>,
    pub milestones: Vec<Milestone>,
    pub open_task_count: usize,
}

impl OpenProject {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            tab: ProjectTab::Overview,
            messages: Vec::new(),
            tasks: Vec::new(),
            milestones: Vec::new(),
            open_task_count: 0,
        }
    }

    pub fn id(&self) -> Id {
        self.project.id
    }

    pub(crate) fn set_messages(&mut self, mut messages: Vec<Message>) {
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        self.messages = messages;
    }

    pub(crate) fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.open_task_count = open_task_count(&tasks);
        self.tasks = tasks;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing outcome of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Everything the dashboard currently holds
#[derive(Debug, Clone, Default)]
pub struct AppState {
    page: Page,
    view: View,
    user: Option<User>,
    open_project: Option<OpenProject>,
    directory: Paginator<Project>,
    keyword: Option<String>,
    my_projects: Vec<Project>,
    students: Vec<StudentSummary>,
    profile: Option<Profile>,
    submissions: Vec<CustomProjectSubmission>,
    announcements: Vec<Announcement>,
    announcement_scope: Option<Id>,
    crns: Vec<Crn>,
    calendar: CalendarState,
    notices: Vec<Notice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Reads ============

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn open_project(&self) -> Option<&OpenProject> {
        self.open_project.as_ref()
    }

    pub fn directory(&self) -> &Paginator<Project> {
        &self.directory
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn my_projects(&self) -> &[Project] {
        &self.my_projects
    }

    pub fn students(&self) -> &[StudentSummary] {
        &self.students
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn submissions(&self) -> &[CustomProjectSubmission] {
        &self.submissions
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn announcement_scope(&self) -> Option<Id> {
        self.announcement_scope
    }

    pub fn crns(&self) -> &[Crn] {
        &self.crns
    }

    pub fn calendar(&self) -> &CalendarState {
        &self.calendar
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Every project the client has a copy of, for the one-project check.
    /// "My projects" is built from detail records, so it is the reliable part.
    fn known_projects(&self) -> impl Iterator<Item = &Project> {
        self.directory.items().iter().chain(self.my_projects.iter())
    }

    /// Membership action for `project` as seen by the signed-in user
    pub fn affordance_for(&self, project: &Project) -> Option<Affordance> {
        let user = self.user.as_ref()?;
        // a listing entry may not name its team; my copy of it does
        let project = if project.lists_team() {
            project
        } else {
            self.my_projects.iter().find(|p| p.id == project.id).unwrap_or(project)
        };
        let known: Vec<Project> = self.known_projects().cloned().collect();
        Some(membership::affordance(user, project, &known))
    }

    // ============ Writes ============

    pub(crate) fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub(crate) fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn set_open_project(&mut self, open: Option<OpenProject>) {
        self.open_project = open;
    }

    pub(crate) fn open_project_mut(&mut self) -> Option<&mut OpenProject> {
        self.open_project.as_mut()
    }

    pub(crate) fn directory_mut(&mut self) -> &mut Paginator<Project> {
        &mut self.directory
    }

    pub(crate) fn set_directory(&mut self, projects: Vec<Project>, keyword: Option<String>) {
        self.directory.replace(projects);
        self.keyword = keyword;
    }

    pub(crate) fn set_my_projects(&mut self, projects: Vec<Project>) {
        self.my_projects = projects;
    }

    pub(crate) fn set_students(&mut self, students: Vec<StudentSummary>) {
        self.students = students;
    }

    pub(crate) fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    pub(crate) fn set_submissions(&mut self, submissions: Vec<CustomProjectSubmission>) {
        self.submissions = submissions;
    }

    pub(crate) fn set_announcements(&mut self, announcements: Vec<Announcement>, scope: Option<Id>) {
        self.announcements = announcements;
        self.announcement_scope = scope;
    }

    pub(crate) fn set_crns(&mut self, crns: Vec<Crn>) {
        self.crns = crns;
    }

    pub(crate) fn calendar_mut(&mut self) -> &mut CalendarState {
        &mut self.calendar
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub(crate) fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Back to a signed-out login screen
    pub(crate) fn reset(&mut self) {
        let notices = self.drain_notices();
        *self = Self {
            notices,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time::parse_timestamp;

    fn message(id: Id, at: &str) -> Message {
        Message {
            id,
            sender: UserRef {
                id: 1,
                name: "Ana Ruiz".into(),
            },
            content: format!("m{id}"),
            message_type: "group".into(),
            created_at: parse_timestamp(at).unwrap(),
        }
    }

    fn task(id: Id, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("t{id}"),
            description: None,
            status,
            assignee: None,
            due_date: None,
            created_at: None,
        }
    }

    fn project() -> Project {
        serde_json::from_str(r#"{"id":1,"name":"P","capacity":3,"current_members":0}"#).unwrap()
    }

    #[test]
    fn test_messages_oldest_first() {
        let mut open = OpenProject::new(project());
        open.set_messages(vec![
            message(3, "2025-03-01T10:05:00"),
            message(1, "2025-03-01T09:00:00"),
            message(2, "2025-03-01T10:05:00"),
        ]);
        let ids: Vec<Id> = open.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_open_task_count_recomputed() {
        let mut open = OpenProject::new(project());
        open.set_tasks(vec![
            task(1, TaskStatus::Pending),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::Completed),
        ]);
        assert_eq!(open.open_task_count, 2);

        open.set_tasks(vec![task(3, TaskStatus::Completed)]);
        assert_eq!(open.open_task_count, 0);
    }

    #[test]
    fn test_reset_keeps_pending_notices() {
        let mut state = AppState::new();
        state.set_page(Page::Dashboard);
        state.set_view(View::Calendar);
        state.push_notice(Notice::success("Logged out"));
        state.reset();

        assert_eq!(state.page(), Page::Login);
        assert_eq!(state.view(), View::Overview);
        assert_eq!(state.notices().len(), 1);
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!(ProjectTab::parse("Tasks"), Some(ProjectTab::Tasks));
        assert_eq!(ProjectTab::parse("files"), None);
    }
}

//! Dashboard Controller
//!
//! Every user action is a fetch-then-update cycle: call the backend, then
//! replace the affected slice of [`AppState`]. Mutations never patch cached
//! lists locally; the canonical collection is always requested again.
//!
//! Failures are logged, recorded as an error [`Notice`] and returned. The
//! state is left as it was before the action.

use chrono::NaiveDate;

use crate::api::{ClientError, ClientResult, PortalApi, Transport};
use crate::calendar::{day_summary, MonthGrid, YearMonth};
use crate::forms::{
    self, AnnouncementForm, CrnForm, CustomProjectForm, LoginForm, MilestoneForm, ProfileForm,
    ProjectForm, RegistrationForm, TaskForm,
};
use crate::membership::{self, Affordance};
use crate::model::*;
use crate::session::{SessionStore, StoredSession};
use crate::state::{AppState, Notice, OpenProject, Page, ProjectTab, View};

/// Drives [`AppState`] against the backend
pub struct Dashboard<T, S> {
    api: PortalApi<T>,
    store: S,
    state: AppState,
}

impl<T: Transport, S: SessionStore> Dashboard<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self {
            api: PortalApi::new(transport),
            store,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &PortalApi<T> {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand pending notices to the front-end
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.drain_notices()
    }

    // ============ Plumbing ============

    /// Log and record a failed action
    fn fail(&mut self, fallback: &str, err: ClientError) -> ClientError {
        match &err {
            ClientError::Form(_) | ClientError::NotAllowed(_) => {
                tracing::warn!(error = %err, "{fallback}")
            }
            _ => tracing::error!(error = %err, "{fallback}"),
        }
        self.state.push_notice(Notice::error(err.user_message(fallback)));
        err
    }

    fn check<R>(&mut self, result: ClientResult<R>, fallback: &str) -> ClientResult<R> {
        result.map_err(|e| self.fail(fallback, e))
    }

    fn succeed(&mut self, ack: Ack, default: &str) {
        let text = ack
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_string());
        self.state.push_notice(Notice::success(text));
    }

    fn current_user(&mut self) -> ClientResult<User> {
        match self.state.user() {
            Some(user) => Ok(user.clone()),
            None => Err(self.fail("Please log in first", ClientError::NotSignedIn)),
        }
    }

    fn require_role(&mut self, role: Role, action: &str) -> ClientResult<User> {
        let user = self.current_user()?;
        if user.role == role {
            Ok(user)
        } else {
            let err = ClientError::NotAllowed(format!("Only {role} accounts can {action}"));
            Err(self.fail(action, err))
        }
    }

    fn open_project_id(&mut self) -> ClientResult<Id> {
        match self.state.open_project() {
            Some(open) => Ok(open.id()),
            None => Err(self.fail("Open a project first", ClientError::NoProjectOpen)),
        }
    }

    fn persist(&mut self, user: &User) {
        let session = StoredSession::new(user.clone()).with_cookie(self.api.transport().session_token());
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "could not persist session");
        }
    }

    // ============ Session ============

    /// Sign in and land on the dashboard overview
    pub async fn login(&mut self, form: &LoginForm) -> ClientResult<User> {
        let credentials = self.check(form.parse().map_err(Into::into), "Login failed")?;

        let result = self.api.login(&credentials).await;
        let user = self.check(result, "Login failed")?;

        tracing::info!(user = %user.username, role = %user.role, "signed in");
        self.persist(&user);
        self.state.set_user(user.clone());
        self.state.set_page(Page::Dashboard);

        // The sign-in stands even if the first overview fetch fails
        if let Err(e) = self.show_view(View::Overview).await {
            tracing::warn!(error = %e, "overview unavailable after login");
        }
        Ok(user)
    }

    /// Create an account; success returns to the login screen
    pub async fn register(&mut self, form: &RegistrationForm) -> ClientResult<()> {
        let registration = self.check(form.parse().map_err(Into::into), "Registration failed")?;

        let result = self.api.register(&registration).await;
        self.check(result, "Registration failed")?;

        tracing::info!(user = %registration.username, "registered");
        self.state
            .push_notice(Notice::success("Registration successful! Please login."));
        self.state.set_page(Page::Login);
        Ok(())
    }

    /// End the session; local state is cleared whatever the backend says
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "server-side logout failed");
        }
        self.api.transport().forget_session();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear stored session");
        }
        self.state.reset();
        tracing::info!("signed out");
    }

    /// Trust a stored session without asking the backend.
    ///
    /// Lands on the dashboard overview but does not fetch; the front-end
    /// follows up with [`show_view`](Self::show_view).
    pub fn restore_session(&mut self) -> Option<User> {
        let stored = match self.store.load() {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored session");
                return None;
            }
        };

        if let Some(cookie) = &stored.cookie {
            self.api.transport().resume_session(cookie);
        }

        tracing::info!(user = %stored.user.username, "session restored");
        self.state.set_user(stored.user.clone());
        self.state.set_page(Page::Dashboard);
        self.state.set_view(View::Overview);
        Some(stored.user)
    }

    // ============ Navigation ============

    /// Switch between login and registration screens, or to the dashboard
    /// when signed in
    pub fn show_page(&mut self, page: Page) -> ClientResult<()> {
        if page == Page::Dashboard && !self.state.is_signed_in() {
            return Err(self.fail("Please log in first", ClientError::NotSignedIn));
        }
        self.state.set_page(page);
        Ok(())
    }

    /// Make `view` the visible section and refetch its data
    pub async fn show_view(&mut self, view: View) -> ClientResult<()> {
        let user = self.current_user()?;
        self.state.set_view(view);
        tracing::debug!(view = view.label(), "view selected");

        match view {
            View::Overview => self.load_my_projects().await,
            View::Projects => self.load_projects(None).await,
            View::Students => self.load_students(None).await,
            View::Announcements => self.load_announcements(None).await,
            View::Calendar => self.load_calendar().await,
            View::Sections => {
                self.load_submissions().await?;
                if user.is_faculty() {
                    self.load_crns().await?;
                }
                Ok(())
            }
            View::Profile => self.load_profile().await,
        }
    }

    // ============ Projects ============

    /// Replace the directory with the backend's list, optionally filtered
    pub async fn load_projects(&mut self, keyword: Option<&str>) -> ClientResult<()> {
        let keyword = keyword.and_then(forms::optional);
        let result = self.api.projects(keyword.as_deref()).await;
        let projects = self.check(result, "Failed to load projects")?;

        tracing::debug!(count = projects.len(), ?keyword, "directory loaded");
        self.state.set_directory(projects, keyword);
        Ok(())
    }

    /// Search as typed; each call is a new request
    pub async fn search_projects(&mut self, keyword: &str) -> ClientResult<()> {
        self.load_projects(Some(keyword)).await
    }

    /// Change directory page without refetching
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.state.directory_mut().go_to(page)
    }

    pub fn next_page(&mut self) -> usize {
        self.state.directory_mut().next()
    }

    pub fn prev_page(&mut self) -> usize {
        self.state.directory_mut().prev()
    }

    /// Projects the current user belongs to
    pub async fn load_my_projects(&mut self) -> ClientResult<()> {
        let user = self.current_user()?;
        let result = self.api.projects(None).await;
        let listing = self.check(result, "Failed to load projects")?;
        let directory = self.with_team_lists(listing).await?;

        let mine = membership::projects_of(&directory, user.id)
            .into_iter()
            .cloned()
            .collect();
        self.state.set_my_projects(mine);
        Ok(())
    }

    /// Replace listing entries that count members without naming them by
    /// their detail record
    async fn with_team_lists(&mut self, listing: Vec<Project>) -> ClientResult<Vec<Project>> {
        let mut projects = Vec::with_capacity(listing.len());
        for project in listing {
            if project.lists_team() {
                projects.push(project);
                continue;
            }
            let result = self.api.project(project.id).await;
            projects.push(self.check(result, "Failed to load projects")?);
        }
        Ok(projects)
    }

    /// Faculty only
    pub async fn create_project(&mut self, form: &ProjectForm) -> ClientResult<()> {
        self.require_role(Role::Faculty, "create projects")?;
        let project = self.check(form.parse().map_err(Into::into), "Failed to create project")?;

        let result = self.api.create_project(&project).await;
        let ack = self.check(result, "Failed to create project")?;
        self.succeed(ack, "Project created successfully");

        let keyword = self.state.keyword().map(str::to_string);
        self.load_projects(keyword.as_deref()).await
    }

    // ============ Project detail ============

    /// Fetch a project and open its detail view on the overview tab
    pub async fn open_project(&mut self, id: Id) -> ClientResult<()> {
        self.current_user()?;
        let result = self.api.project(id).await;
        let project = self.check(result, "Failed to load project details")?;
        self.state.set_open_project(Some(OpenProject::new(project)));
        Ok(())
    }

    pub fn close_project(&mut self) {
        self.state.set_open_project(None);
    }

    /// Switch tab and fetch its contents, every time
    pub async fn select_tab(&mut self, tab: ProjectTab) -> ClientResult<()> {
        let id = self.open_project_id()?;
        if let Some(open) = self.state.open_project_mut() {
            open.tab = tab;
        }

        match tab {
            ProjectTab::Overview => self.reload_detail(id).await,
            ProjectTab::Messages => self.load_messages(id).await,
            ProjectTab::Tasks => self.load_tasks(id).await,
            ProjectTab::Milestones => self.load_milestones(id).await,
        }
    }

    async fn reload_detail(&mut self, id: Id) -> ClientResult<()> {
        let result = self.api.project(id).await;
        let project = self.check(result, "Failed to load project details")?;
        if let Some(open) = self.state.open_project_mut().filter(|o| o.id() == id) {
            open.project = project;
        }
        Ok(())
    }

    async fn load_messages(&mut self, id: Id) -> ClientResult<()> {
        let result = self.api.messages(id).await;
        let messages = self.check(result, "Failed to load messages")?;
        if let Some(open) = self.state.open_project_mut().filter(|o| o.id() == id) {
            open.set_messages(messages);
        }
        Ok(())
    }

    async fn load_tasks(&mut self, id: Id) -> ClientResult<()> {
        let result = self.api.tasks(id).await;
        let tasks = self.check(result, "Failed to load tasks")?;
        if let Some(open) = self.state.open_project_mut().filter(|o| o.id() == id) {
            open.set_tasks(tasks);
        }
        Ok(())
    }

    async fn load_milestones(&mut self, id: Id) -> ClientResult<()> {
        let result = self.api.milestones(id).await;
        let milestones = self.check(result, "Failed to load milestones")?;
        if let Some(open) = self.state.open_project_mut().filter(|o| o.id() == id) {
            open.milestones = milestones;
        }
        Ok(())
    }

    // ============ Membership ============

    /// The open project if it is `id`, otherwise its detail record. Listing
    /// entries are never used here since they may omit the team.
    async fn project_for_membership(&mut self, id: Id) -> ClientResult<Project> {
        if let Some(open) = self.state.open_project().filter(|o| o.id() == id) {
            return Ok(open.project.clone());
        }
        let result = self.api.project(id).await;
        self.check(result, "Failed to load project details")
    }

    fn membership_action(&mut self, project: &Project) -> ClientResult<Affordance> {
        match self.state.affordance_for(project) {
            Some(affordance) => Ok(affordance),
            None => Err(self.fail("Please log in first", ClientError::NotSignedIn)),
        }
    }

    /// Join a project, subject to the membership rules
    pub async fn join_project(&mut self, id: Id) -> ClientResult<()> {
        let project = self.project_for_membership(id).await?;
        if self.membership_action(&project)?.can_join() {
            // the one-project check reads "my projects"
            self.load_my_projects().await?;
        }
        match self.membership_action(&project)? {
            Affordance::Join => {}
            Affordance::Leave => {
                let err = ClientError::NotAllowed("You are already a member of this project".into());
                return Err(self.fail("Failed to join project", err));
            }
            Affordance::Unavailable(block) => {
                let err = ClientError::NotAllowed(block.to_string());
                return Err(self.fail("Failed to join project", err));
            }
        }

        let result = self.api.join_project(id).await;
        let ack = self.check(result, "Failed to join project")?;
        tracing::info!(project = id, "joined project");
        self.succeed(ack, "Successfully joined project");

        self.reload_after_membership_change(id).await
    }

    /// Leave a project. Nothing is sent unless `confirmed`.
    pub async fn leave_project(&mut self, id: Id, confirmed: bool) -> ClientResult<()> {
        if !confirmed {
            return Err(ClientError::Unconfirmed);
        }

        let project = self.project_for_membership(id).await?;
        if !self.membership_action(&project)?.can_leave() {
            let err = ClientError::NotAllowed("You are not a member of this project".into());
            return Err(self.fail("Failed to leave project", err));
        }

        let result = self.api.leave_project(id).await;
        let ack = self.check(result, "Failed to leave project")?;
        tracing::info!(project = id, "left project");
        self.succeed(ack, "Successfully left project");

        self.reload_after_membership_change(id).await
    }

    async fn reload_after_membership_change(&mut self, id: Id) -> ClientResult<()> {
        let is_open = self.state.open_project().is_some_and(|o| o.id() == id);
        if is_open {
            self.reload_detail(id).await?;
        }
        let keyword = self.state.keyword().map(str::to_string);
        self.load_projects(keyword.as_deref()).await?;
        self.load_my_projects().await
    }

    // ============ Collaboration ============

    pub async fn send_message(&mut self, content: &str) -> ClientResult<()> {
        let id = self.open_project_id()?;
        let message = self.check(forms::message(content).map_err(Into::into), "Failed to send message")?;

        let result = self.api.send_message(id, &message).await;
        self.check(result, "Failed to send message")?;
        self.load_messages(id).await
    }

    pub async fn create_task(&mut self, form: &TaskForm) -> ClientResult<()> {
        let id = self.open_project_id()?;
        let task = self.check(form.parse().map_err(Into::into), "Failed to create task")?;

        let result = self.api.create_task(id, &task).await;
        let ack = self.check(result, "Failed to create task")?;
        self.succeed(ack, "Task created successfully");
        self.load_tasks(id).await
    }

    pub async fn update_task_status(&mut self, task_id: Id, status: TaskStatus) -> ClientResult<()> {
        let id = self.open_project_id()?;
        let result = self.api.update_task(task_id, &TaskUpdate { status }).await;
        let ack = self.check(result, "Failed to update task")?;
        self.succeed(ack, "Task updated successfully");
        self.load_tasks(id).await
    }

    pub async fn create_milestone(&mut self, form: &MilestoneForm) -> ClientResult<()> {
        let id = self.open_project_id()?;
        let milestone = self.check(form.parse().map_err(Into::into), "Failed to create milestone")?;

        let result = self.api.create_milestone(id, &milestone).await;
        let ack = self.check(result, "Failed to create milestone")?;
        self.succeed(ack, "Milestone created successfully");
        self.load_milestones(id).await
    }

    // ============ People ============

    pub async fn load_students(&mut self, keyword: Option<&str>) -> ClientResult<()> {
        let result = self.api.students(keyword).await;
        let students = self.check(result, "Failed to load students")?;
        self.state.set_students(students);
        Ok(())
    }

    pub async fn load_profile(&mut self) -> ClientResult<()> {
        let result = self.api.profile().await;
        let profile = self.check(result, "Failed to load profile")?;
        self.state.set_profile(profile);
        Ok(())
    }

    pub async fn update_profile(&mut self, form: &ProfileForm) -> ClientResult<()> {
        self.current_user()?;
        let result = self.api.update_profile(&form.parse()).await;
        let ack = self.check(result, "Failed to update profile")?;
        self.succeed(ack, "Profile updated successfully");
        self.load_profile().await
    }

    // ============ Proposals ============

    /// Students propose their own project for faculty review
    pub async fn submit_custom_project(&mut self, form: &CustomProjectForm) -> ClientResult<()> {
        self.require_role(Role::Student, "submit project proposals")?;
        let proposal = self.check(form.parse().map_err(Into::into), "Failed to submit project")?;

        let result = self.api.submit_custom_project(&proposal).await;
        let ack = self.check(result, "Failed to submit project")?;
        self.succeed(ack, "Project submitted for approval");
        self.load_submissions().await
    }

    pub async fn load_submissions(&mut self) -> ClientResult<()> {
        let result = self.api.custom_projects().await;
        let submissions = self.check(result, "Failed to load submissions")?;
        self.state.set_submissions(submissions);
        Ok(())
    }

    /// Approve or reject a pending proposal. Approval reloads the directory,
    /// where the backend adds the new project.
    pub async fn review_submission(&mut self, id: Id, decision: ReviewDecision) -> ClientResult<()> {
        self.require_role(Role::Faculty, "review project proposals")?;

        let already_reviewed = self
            .state
            .submissions()
            .iter()
            .any(|s| s.id == id && !s.is_pending());
        if already_reviewed {
            let err = ClientError::NotAllowed("This submission has already been reviewed".into());
            return Err(self.fail("Failed to review submission", err));
        }

        let result = self.api.review_custom_project(id, decision).await;
        let ack = self.check(result, "Failed to review submission")?;
        let default = match decision {
            ReviewDecision::Approved => "Project approved",
            ReviewDecision::Rejected => "Project rejected",
        };
        self.succeed(ack, default);

        self.load_submissions().await?;
        if decision == ReviewDecision::Approved {
            let keyword = self.state.keyword().map(str::to_string);
            self.load_projects(keyword.as_deref()).await?;
        }
        Ok(())
    }

    // ============ Announcements ============

    /// Announcements for one project, or every visible one
    pub async fn load_announcements(&mut self, project_id: Option<Id>) -> ClientResult<()> {
        let result = self.api.announcements(project_id).await;
        let announcements = self.check(result, "Failed to load announcements")?;
        self.state.set_announcements(announcements, project_id);
        Ok(())
    }

    /// Students must scope to a project; this is checked before any request
    pub async fn post_announcement(&mut self, form: &AnnouncementForm) -> ClientResult<()> {
        let user = self.current_user()?;
        let announcement = self.check(
            form.parse(user.role).map_err(Into::into),
            "Failed to post announcement",
        )?;

        let result = self.api.post_announcement(&announcement).await;
        let ack = self.check(result, "Failed to post announcement")?;
        self.succeed(ack, "Announcement posted");

        let scope = self.state.announcement_scope();
        self.load_announcements(scope).await
    }

    pub async fn delete_announcement(&mut self, id: Id) -> ClientResult<()> {
        self.current_user()?;
        let result = self.api.delete_announcement(id).await;
        let ack = self.check(result, "Failed to delete announcement")?;
        self.succeed(ack, "Announcement deleted");

        let scope = self.state.announcement_scope();
        self.load_announcements(scope).await
    }

    // ============ Sections ============

    pub async fn load_crns(&mut self) -> ClientResult<()> {
        let result = self.api.crns().await;
        let crns = self.check(result, "Failed to load CRNs")?;
        self.state.set_crns(crns);
        Ok(())
    }

    pub async fn create_crn(&mut self, form: &CrnForm) -> ClientResult<()> {
        self.require_role(Role::Faculty, "manage course sections")?;
        let crn = self.check(form.parse().map_err(Into::into), "Failed to create CRN")?;

        let result = self.api.create_crn(&crn).await;
        let ack = self.check(result, "Failed to create CRN")?;
        self.succeed(ack, "CRN created successfully");
        self.load_crns().await
    }

    pub async fn delete_crn(&mut self, id: Id) -> ClientResult<()> {
        self.require_role(Role::Faculty, "manage course sections")?;
        let result = self.api.delete_crn(id).await;
        let ack = self.check(result, "Failed to delete CRN")?;
        self.succeed(ack, "CRN deleted");
        self.load_crns().await
    }

    // ============ Calendar ============

    /// Fetch every assignment once; month navigation reuses the set
    pub async fn load_calendar(&mut self) -> ClientResult<()> {
        let result = self.api.assignments().await;
        let assignments = self.check(result, "Failed to load calendar")?;
        self.state.calendar_mut().set_assignments(&assignments);
        Ok(())
    }

    pub fn calendar_show(&mut self, month: YearMonth) -> MonthGrid {
        self.state.calendar_mut().set_cursor(month);
        self.state.calendar().grid()
    }

    pub fn calendar_next(&mut self) -> MonthGrid {
        self.state.calendar_mut().next();
        self.state.calendar().grid()
    }

    pub fn calendar_prev(&mut self) -> MonthGrid {
        self.state.calendar_mut().prev();
        self.state.calendar().grid()
    }

    /// Listing for a clicked day; `None` for unmarked days
    pub fn calendar_day(&self, date: NaiveDate) -> Option<String> {
        let assignments = self.state.calendar().assignments_on(date);
        (!assignments.is_empty()).then(|| day_summary(date, assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakePortal;
    use crate::api::Method;
    use crate::forms::FormError;
    use crate::session::MemorySessionStore;
    use crate::state::NoticeLevel;

    type TestDashboard = Dashboard<FakePortal, MemorySessionStore>;

    fn credentials(username: &str) -> LoginForm {
        LoginForm {
            username: username.into(),
            password: "secret".into(),
        }
    }

    async fn signed_in(username: &str) -> TestDashboard {
        let mut dash = Dashboard::new(FakePortal::new(), MemorySessionStore::new());
        dash.login(&credentials(username)).await.unwrap();
        dash.take_notices();
        dash
    }

    fn last_error(dash: &mut TestDashboard) -> String {
        dash.take_notices()
            .into_iter()
            .rev()
            .find(|n| n.is_error())
            .map(|n| n.text)
            .unwrap_or_default()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_login_persists_session_and_opens_dashboard() {
        let dash = signed_in("ana").await;

        assert_eq!(dash.state().page(), Page::Dashboard);
        assert_eq!(dash.state().view(), View::Overview);
        let stored = dash.store().load().unwrap().unwrap();
        assert_eq!(stored.user.username, "ana");
        assert_eq!(stored.cookie.as_deref(), Some("session=user-1"));
    }

    #[tokio::test]
    async fn test_failed_login_surfaces_server_message() {
        let mut dash = Dashboard::new(FakePortal::new(), MemorySessionStore::new());
        let err = dash
            .login(&LoginForm {
                username: "ana".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(last_error(&mut dash), "Invalid credentials");
        assert_eq!(dash.state().page(), Page::Login);
        assert!(dash.store().load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_is_generic() {
        let fake = FakePortal::new();
        fake.set_offline(true);
        let mut dash = Dashboard::new(fake, MemorySessionStore::new());

        assert!(dash.login(&credentials("ana")).await.is_err());
        assert_eq!(last_error(&mut dash), "An error occurred");
    }

    #[tokio::test]
    async fn test_register_returns_to_login() {
        let mut dash = Dashboard::new(FakePortal::new(), MemorySessionStore::new());
        dash.show_page(Page::Register).unwrap();

        let form = RegistrationForm {
            username: "cara".into(),
            email: "cara@uni.edu".into(),
            password: "pw".into(),
            first_name: "Cara".into(),
            last_name: "Diaz".into(),
            role: "student".into(),
            crn: "40123".into(),
            title: String::new(),
        };
        dash.register(&form).await.unwrap();
        assert_eq!(dash.state().page(), Page::Login);

        let sent = dash.api().transport().requests();
        let body = sent.last().unwrap().body.clone().unwrap();
        assert_eq!(body["crn"], "40123");
        assert!(body.get("title").is_none());

        let again = dash.register(&form).await.unwrap_err();
        assert_eq!(again.user_message("x"), "Username already exists");
    }

    #[tokio::test]
    async fn test_logout_clears_state_even_when_offline() {
        let mut dash = signed_in("ana").await;
        dash.api().transport().set_offline(true);

        dash.logout().await;
        assert_eq!(dash.state().page(), Page::Login);
        assert!(dash.state().user().is_none());
        assert!(dash.store().load().unwrap().is_none());
        assert_eq!(dash.api().transport().session_token(), None);
    }

    #[tokio::test]
    async fn test_restore_session_trusts_stored_user() {
        let dash = signed_in("ana").await;
        let stored = dash.store().load().unwrap().unwrap();

        let fake = FakePortal::new();
        let mut restored = Dashboard::new(fake, MemorySessionStore::with_session(stored));
        let user = restored.restore_session().unwrap();

        assert_eq!(user.username, "ana");
        assert_eq!(restored.state().page(), Page::Dashboard);
        // No request was needed to restore
        assert_eq!(restored.api().transport().request_count(), 0);
        // The resumed cookie is accepted by the backend
        restored.load_projects(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_requires_sign_in() {
        let mut dash = Dashboard::new(FakePortal::new(), MemorySessionStore::new());
        assert!(matches!(dash.show_page(Page::Dashboard), Err(ClientError::NotSignedIn)));
        assert!(matches!(
            dash.show_view(View::Projects).await,
            Err(ClientError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_every_visit_refetches() {
        let mut dash = signed_in("ana").await;
        let before = dash.api().transport().request_count();

        dash.show_view(View::Projects).await.unwrap();
        dash.show_view(View::Students).await.unwrap();
        dash.show_view(View::Projects).await.unwrap();

        assert_eq!(dash.api().transport().request_count(), before + 3);
        assert_eq!(dash.state().view(), View::Projects);
        assert_eq!(dash.state().directory().len(), 3);
        assert_eq!(dash.state().students().len(), 2);
    }

    #[tokio::test]
    async fn test_pagination_and_search_reset() {
        let mut dash = signed_in("ana").await;
        dash.api().transport().seed_projects(13);

        dash.load_projects(None).await.unwrap();
        assert_eq!(dash.state().directory().page_count(), 3);

        let sent = dash.api().transport().request_count();
        assert_eq!(dash.go_to_page(3), 3);
        assert_eq!(dash.state().directory().current().len(), 1);
        // Paging is local
        assert_eq!(dash.api().transport().request_count(), sent);

        dash.search_projects("Project 1").await.unwrap();
        assert_eq!(dash.state().directory().page(), 1);
        assert_eq!(dash.state().keyword(), Some("Project 1"));
        // "Project 1", "Project 10".."Project 13"
        assert_eq!(dash.state().directory().len(), 5);
        assert_eq!(dash.state().directory().page_count(), 1);
    }

    #[tokio::test]
    async fn test_join_shows_member_and_hides_join() {
        let mut dash = signed_in("ana").await;
        dash.load_projects(None).await.unwrap();

        dash.join_project(1).await.unwrap();
        dash.open_project(1).await.unwrap();

        let open = dash.state().open_project().unwrap();
        assert!(open.project.team_members.iter().any(|m| m.name == "Ana Ruiz"));
        let affordance = dash.state().affordance_for(&open.project).unwrap();
        assert_eq!(affordance, Affordance::Leave);
        assert_eq!(dash.state().my_projects().len(), 1);
    }

    #[tokio::test]
    async fn test_join_blocked_when_member_elsewhere() {
        let mut dash = signed_in("ana").await;
        dash.load_projects(None).await.unwrap();
        dash.join_project(1).await.unwrap();
        dash.take_notices();

        let err = dash.join_project(2).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAllowed(_)));
        assert_eq!(last_error(&mut dash), "You are already a member of Campus Navigator");
        // Rejected before the join request
        assert_eq!(dash.api().transport().sent(Method::Post, "/2/join"), 0);
        assert!(!dash.api().transport().members_of(2).contains(&1));
    }

    #[tokio::test]
    async fn test_join_blocked_when_listing_omits_members() {
        let mut dash = signed_in("ben").await;
        dash.api().transport().hide_members_in_listing();
        dash.load_projects(None).await.unwrap();
        dash.take_notices();

        let err = dash.join_project(2).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAllowed(_)));
        assert_eq!(last_error(&mut dash), "You are already a member of Campus Navigator");
        assert_eq!(dash.api().transport().sent(Method::Post, "/2/join"), 0);
        assert!(!dash.api().transport().members_of(2).contains(&2));
    }

    #[tokio::test]
    async fn test_my_projects_when_listing_omits_members() {
        let mut dash = signed_in("ben").await;
        dash.api().transport().hide_members_in_listing();
        dash.load_my_projects().await.unwrap();

        let names: Vec<&str> = dash.state().my_projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Campus Navigator", "Data Dashboard"]);
        // Robotics Lab has nobody, so only the other two need a detail fetch
        assert_eq!(dash.api().transport().sent(Method::Get, "/projects/2"), 0);
    }

    #[tokio::test]
    async fn test_listing_entry_offers_leave_to_member() {
        let mut dash = signed_in("ben").await;
        dash.api().transport().hide_members_in_listing();
        dash.load_projects(None).await.unwrap();
        dash.load_my_projects().await.unwrap();

        let listed = dash.state().directory().items()[0].clone();
        assert_eq!(listed.id, 1);
        assert_eq!(dash.state().affordance_for(&listed), Some(Affordance::Leave));
    }

    #[tokio::test]
    async fn test_leave_works_when_listing_omits_members() {
        let mut dash = signed_in("ben").await;
        dash.api().transport().hide_members_in_listing();
        dash.load_projects(None).await.unwrap();

        dash.leave_project(1, true).await.unwrap();
        assert!(!dash.api().transport().members_of(1).contains(&2));
        assert!(dash.state().my_projects().iter().all(|p| p.id != 1));
    }

    #[tokio::test]
    async fn test_membership_ignores_other_open_project() {
        let mut dash = signed_in("ben").await;
        dash.api().transport().hide_members_in_listing();
        dash.load_projects(None).await.unwrap();
        dash.open_project(2).await.unwrap();

        dash.leave_project(3, true).await.unwrap();
        assert!(!dash.api().transport().members_of(3).contains(&2));
    }

    #[tokio::test]
    async fn test_full_project_suppresses_join() {
        let mut dash = signed_in("ana").await;
        dash.api().transport().respond(
            Method::Get,
            "/projects",
            200,
            r#"[{"id":1,"name":"Packed","course":"CS 499","capacity":3,"current_members":3}]"#,
        );
        dash.api().transport().respond(
            Method::Get,
            "/projects/1",
            200,
            r#"{"id":1,"name":"Packed","course":"CS 499","capacity":3,"current_members":3,
                "team_members":[{"id":2,"name":"Ben Okafor"},{"id":20,"name":"Cy"},{"id":21,"name":"Di"}]}"#,
        );
        dash.load_projects(None).await.unwrap();

        let project = dash.state().directory().items()[0].clone();
        assert_eq!(project.effective_status().label(), "Full");
        assert_eq!(
            dash.state().affordance_for(&project),
            Some(Affordance::Unavailable(membership::JoinBlock::Full))
        );

        assert!(dash.join_project(1).await.is_err());
        assert_eq!(dash.api().transport().sent(Method::Post, "/join"), 0);
    }

    #[tokio::test]
    async fn test_leave_needs_confirmation() {
        let mut dash = signed_in("ben").await;
        dash.load_projects(None).await.unwrap();
        let sent = dash.api().transport().request_count();

        assert!(matches!(
            dash.leave_project(1, false).await,
            Err(ClientError::Unconfirmed)
        ));
        assert_eq!(dash.api().transport().request_count(), sent);

        dash.leave_project(1, true).await.unwrap();
        assert!(!dash.api().transport().members_of(1).contains(&2));
    }

    #[tokio::test]
    async fn test_leave_requires_membership() {
        let mut dash = signed_in("ana").await;
        dash.load_projects(None).await.unwrap();
        let err = dash.leave_project(2, true).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAllowed(_)));
    }

    #[tokio::test]
    async fn test_tabs_fetch_every_time() {
        let mut dash = signed_in("ben").await;
        dash.open_project(1).await.unwrap();

        let sent = dash.api().transport().request_count();
        dash.select_tab(ProjectTab::Tasks).await.unwrap();
        dash.select_tab(ProjectTab::Messages).await.unwrap();
        dash.select_tab(ProjectTab::Tasks).await.unwrap();
        assert_eq!(dash.api().transport().request_count(), sent + 3);
        assert_eq!(dash.state().open_project().unwrap().tab, ProjectTab::Tasks);
    }

    #[tokio::test]
    async fn test_messages_sorted_oldest_first() {
        let mut dash = signed_in("ben").await;
        dash.open_project(1).await.unwrap();
        dash.send_message("first").await.unwrap();
        dash.send_message("second").await.unwrap();

        let contents: Vec<&str> = dash
            .state()
            .open_project()
            .unwrap()
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);

        let sent = dash.api().transport().requests();
        let body = sent
            .iter()
            .rev()
            .find(|r| r.method == Method::Post)
            .and_then(|r| r.body.clone())
            .unwrap();
        assert_eq!(body["message_type"], "group");
    }

    #[tokio::test]
    async fn test_task_lifecycle_updates_open_count() {
        let mut dash = signed_in("ben").await;
        dash.open_project(1).await.unwrap();

        for title in ["Wireframes", "API"] {
            dash.create_task(&TaskForm {
                title: title.into(),
                ..TaskForm::default()
            })
            .await
            .unwrap();
        }
        assert_eq!(dash.state().open_project().unwrap().open_task_count, 2);

        let task_id = dash.state().open_project().unwrap().tasks[0].id;
        dash.update_task_status(task_id, TaskStatus::Completed).await.unwrap();
        assert_eq!(dash.state().open_project().unwrap().open_task_count, 1);
    }

    #[tokio::test]
    async fn test_collaboration_needs_open_project() {
        let mut dash = signed_in("ben").await;
        assert!(matches!(
            dash.send_message("hi").await,
            Err(ClientError::NoProjectOpen)
        ));
    }

    #[tokio::test]
    async fn test_milestone_created_and_listed() {
        let mut dash = signed_in("ben").await;
        dash.open_project(1).await.unwrap();
        dash.create_milestone(&MilestoneForm {
            title: "Beta".into(),
            description: String::new(),
            due_date: "2025-05-01".into(),
        })
        .await
        .unwrap();

        let open = dash.state().open_project().unwrap();
        assert_eq!(open.milestones.len(), 1);
        assert_eq!(open.milestones[0].status, "upcoming");
    }

    #[tokio::test]
    async fn test_student_announcement_without_project_never_sent() {
        let mut dash = signed_in("ana").await;
        let sent = dash.api().transport().request_count();

        let err = dash
            .post_announcement(&AnnouncementForm {
                title: "Hello".into(),
                content: "World".into(),
                ..AnnouncementForm::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Form(FormError::ProjectRequired)));
        assert_eq!(dash.api().transport().request_count(), sent);
        assert_eq!(
            last_error(&mut dash),
            "Students must choose a project for announcements"
        );
    }

    #[tokio::test]
    async fn test_delete_announcement_refreshes_listing() {
        let mut dash = signed_in("drxu").await;
        for title in ["Kickoff", "Deadline moved"] {
            dash.post_announcement(&AnnouncementForm {
                title: title.into(),
                content: "details".into(),
                ..AnnouncementForm::default()
            })
            .await
            .unwrap();
        }
        assert_eq!(dash.state().announcements().len(), 2);

        let id = dash.state().announcements()[0].id;
        dash.delete_announcement(id).await.unwrap();

        let deleted = dash
            .api()
            .transport()
            .requests()
            .into_iter()
            .any(|r| r.method == Method::Delete && r.path == format!("/user-stories/{id}"));
        assert!(deleted);
        assert!(dash.state().announcements().iter().all(|a| a.id != id));
        assert_eq!(dash.state().announcements().len(), 1);
    }

    #[tokio::test]
    async fn test_crn_management() {
        let mut dash = signed_in("drxu").await;
        dash.create_crn(&CrnForm {
            code: "40123".into(),
            course_name: "Senior Project".into(),
        })
        .await
        .unwrap();
        assert_eq!(dash.state().crns().len(), 1);

        let id = dash.state().crns()[0].id;
        dash.delete_crn(id).await.unwrap();
        assert!(dash.state().crns().is_empty());
    }

    #[tokio::test]
    async fn test_students_cannot_manage_crns() {
        let mut dash = signed_in("ana").await;
        let err = dash
            .create_crn(&CrnForm {
                code: "1".into(),
                course_name: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAllowed(_)));
    }

    #[tokio::test]
    async fn test_approval_reloads_directory() {
        let mut student = signed_in("ana").await;
        student
            .submit_custom_project(&CustomProjectForm {
                name: "Study Buddy".into(),
                description: "Pairs students".into(),
                course: "CS 499".into(),
                capacity: "4".into(),
                notes: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(student.state().submissions().len(), 1);

        // Same backend, different user
        let mut faculty = student;
        faculty.logout().await;
        faculty.login(&credentials("drxu")).await.unwrap();
        faculty.load_submissions().await.unwrap();
        faculty.load_projects(None).await.unwrap();
        assert_eq!(faculty.state().directory().len(), 3);

        let id = faculty.state().submissions()[0].id;
        faculty.review_submission(id, ReviewDecision::Approved).await.unwrap();
        assert_eq!(faculty.state().directory().len(), 4);
        assert!(!faculty.state().submissions()[0].is_pending());

        let again = faculty.review_submission(id, ReviewDecision::Rejected).await;
        assert!(matches!(again, Err(ClientError::NotAllowed(_))));
    }

    #[tokio::test]
    async fn test_faculty_creates_project() {
        let mut dash = signed_in("drxu").await;
        dash.create_project(&ProjectForm {
            name: "Compilers".into(),
            description: "Toy compiler".into(),
            course: "CS 499".into(),
            capacity: "5".into(),
        })
        .await
        .unwrap();
        assert!(dash
            .state()
            .directory()
            .items()
            .iter()
            .any(|p| p.name == "Compilers" && p.capacity == 5));

        let notices = dash.take_notices();
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_profile_update_reloads() {
        let mut dash = signed_in("ana").await;
        dash.show_view(View::Profile).await.unwrap();
        let profile = dash.state().profile().unwrap().clone();
        assert_eq!(profile.skills.as_deref(), Some("rust, sql"));

        let form = ProfileForm::from_profile(&profile);
        dash.update_profile(&form).await.unwrap();
        let sent = dash.api().transport().requests();
        assert!(sent.iter().any(|r| r.method == Method::Put && r.path == "/user/profile"));
    }

    #[tokio::test]
    async fn test_calendar_navigation_is_local() {
        let mut dash = signed_in("ana").await;
        let fake = dash.api().transport();
        fake.add_assignment(1, "Design doc", "2025-03-04T23:59:00");
        fake.add_assignment(2, "Prototype", "2025-03-04");
        fake.add_assignment(3, "Final demo", "2025-04-28");
        dash.load_calendar().await.unwrap();

        let sent = dash.api().transport().request_count();
        let march = dash.calendar_show(YearMonth::new(2025, 3).unwrap());
        assert_eq!(march.cells.len(), 42);
        let april = dash.calendar_next();
        assert_eq!(april.month, YearMonth::new(2025, 4).unwrap());
        assert!(april.cells.iter().any(|c| c.in_month && c.is_marked()));
        dash.calendar_prev();
        assert_eq!(dash.api().transport().request_count(), sent);

        let listing = dash.calendar_day(ymd(2025, 3, 4)).unwrap();
        assert!(listing.contains("Design doc") && listing.contains("Prototype"));
        assert!(!listing.contains("Final demo"));
        assert_eq!(dash.calendar_day(ymd(2025, 3, 5)), None);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_state() {
        let mut dash = signed_in("ana").await;
        dash.load_projects(None).await.unwrap();
        dash.api().transport().respond(Method::Get, "/projects", 500, "");

        let err = dash.search_projects("robot").await.unwrap_err();
        assert_eq!(err.user_message("Failed to load projects"), "Failed to load projects");
        assert_eq!(dash.state().directory().len(), 3);
        assert_eq!(dash.state().keyword(), None);
    }
}

//! Typed Portal API Client
//!
//! One async method per backend endpoint, on top of any [`Transport`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::endpoint::{with_query, Endpoint, Method};
use super::error::{ClientError, ClientResult};
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::model::*;

/// Error body returned by the backend (`{"error": "..."}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Typed client for the portal REST API
pub struct PortalApi<T> {
    transport: T,
}

impl<T: Transport> PortalApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ============ Plumbing ============

    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let response = self.transport.send(request).await?;

        if response.is_success() {
            Ok(response)
        } else {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|b| b.error.or(b.message));
            tracing::debug!(status = response.status, ?message, "request rejected");
            Err(ClientError::Status {
                status: response.status,
                message,
            })
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<R> {
        let response = self.execute(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn acknowledge(&self, request: ApiRequest) -> ClientResult<Ack> {
        let response = self.execute(request).await?;
        if response.body.trim().is_empty() {
            return Ok(Ack::default());
        }
        Ok(serde_json::from_str(&response.body).unwrap_or_default())
    }

    fn get(endpoint: Endpoint) -> ApiRequest {
        ApiRequest::new(Method::Get, endpoint.path())
    }

    fn search(endpoint: Endpoint, keyword: Option<&str>) -> ApiRequest {
        let keyword = keyword.map(str::trim).unwrap_or_default().to_string();
        ApiRequest::new(Method::Get, with_query(&endpoint.path(), &[("keyword", keyword)]))
    }

    fn with_json<B: Serialize>(method: Method, endpoint: Endpoint, body: &B) -> ClientResult<ApiRequest> {
        Ok(ApiRequest::new(method, endpoint.path()).with_body(serde_json::to_value(body)?))
    }

    // ============ Session ============

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<User> {
        let request = Self::with_json(Method::Post, Endpoint::Login, credentials)?;
        let response: LoginResponse = self.fetch(request).await?;
        Ok(response.user)
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Register, registration)?;
        self.acknowledge(request).await
    }

    pub async fn logout(&self) -> ClientResult<Ack> {
        self.acknowledge(ApiRequest::new(Method::Post, Endpoint::Logout.path()))
            .await
    }

    // ============ People ============

    pub async fn profile(&self) -> ClientResult<Profile> {
        self.fetch(Self::get(Endpoint::Profile)).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Put, Endpoint::Profile, update)?;
        self.acknowledge(request).await
    }

    pub async fn students(&self, keyword: Option<&str>) -> ClientResult<Vec<StudentSummary>> {
        self.fetch(Self::search(Endpoint::Students, keyword)).await
    }

    // ============ Projects ============

    pub async fn projects(&self, keyword: Option<&str>) -> ClientResult<Vec<Project>> {
        self.fetch(Self::search(Endpoint::Projects, keyword)).await
    }

    pub async fn project(&self, id: Id) -> ClientResult<Project> {
        self.fetch(Self::get(Endpoint::Project(id))).await
    }

    pub async fn create_project(&self, project: &NewProject) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Projects, project)?;
        self.acknowledge(request).await
    }

    pub async fn join_project(&self, id: Id) -> ClientResult<Ack> {
        self.acknowledge(ApiRequest::new(Method::Post, Endpoint::JoinProject(id).path()))
            .await
    }

    pub async fn leave_project(&self, id: Id) -> ClientResult<Ack> {
        self.acknowledge(ApiRequest::new(Method::Post, Endpoint::LeaveProject(id).path()))
            .await
    }

    // ============ Collaboration ============

    pub async fn messages(&self, project_id: Id) -> ClientResult<Vec<Message>> {
        self.fetch(Self::get(Endpoint::Messages(project_id))).await
    }

    pub async fn send_message(&self, project_id: Id, message: &NewMessage) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Messages(project_id), message)?;
        self.acknowledge(request).await
    }

    pub async fn tasks(&self, project_id: Id) -> ClientResult<Vec<Task>> {
        self.fetch(Self::get(Endpoint::Tasks(project_id))).await
    }

    pub async fn create_task(&self, project_id: Id, task: &NewTask) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Tasks(project_id), task)?;
        self.acknowledge(request).await
    }

    pub async fn update_task(&self, task_id: Id, update: &TaskUpdate) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Put, Endpoint::Task(task_id), update)?;
        self.acknowledge(request).await
    }

    pub async fn milestones(&self, project_id: Id) -> ClientResult<Vec<Milestone>> {
        self.fetch(Self::get(Endpoint::Milestones(project_id))).await
    }

    pub async fn create_milestone(&self, project_id: Id, milestone: &NewMilestone) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Milestones(project_id), milestone)?;
        self.acknowledge(request).await
    }

    // ============ Proposals ============

    pub async fn custom_projects(&self) -> ClientResult<Vec<CustomProjectSubmission>> {
        self.fetch(Self::get(Endpoint::CustomProjects)).await
    }

    pub async fn submit_custom_project(&self, proposal: &NewCustomProject) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::CustomProjects, proposal)?;
        self.acknowledge(request).await
    }

    pub async fn review_custom_project(&self, id: Id, decision: ReviewDecision) -> ClientResult<Ack> {
        let request = Self::with_json(
            Method::Put,
            Endpoint::CustomProject(id),
            &Review { status: decision },
        )?;
        self.acknowledge(request).await
    }

    // ============ Announcements ============

    pub async fn announcements(&self, project_id: Option<Id>) -> ClientResult<Vec<Announcement>> {
        let project = project_id.map(|id| id.to_string()).unwrap_or_default();
        let path = with_query(&Endpoint::UserStories.path(), &[("project_id", project)]);
        self.fetch(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn post_announcement(&self, announcement: &NewAnnouncement) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::UserStories, announcement)?;
        self.acknowledge(request).await
    }

    pub async fn delete_announcement(&self, id: Id) -> ClientResult<Ack> {
        self.acknowledge(ApiRequest::new(Method::Delete, Endpoint::UserStory(id).path()))
            .await
    }

    // ============ Sections ============

    pub async fn crns(&self) -> ClientResult<Vec<Crn>> {
        self.fetch(Self::get(Endpoint::Crns)).await
    }

    pub async fn create_crn(&self, crn: &NewCrn) -> ClientResult<Ack> {
        let request = Self::with_json(Method::Post, Endpoint::Crns, crn)?;
        self.acknowledge(request).await
    }

    pub async fn delete_crn(&self, id: Id) -> ClientResult<Ack> {
        self.acknowledge(ApiRequest::new(Method::Delete, Endpoint::Crn(id).path()))
            .await
    }

    // ============ Calendar ============

    pub async fn assignments(&self) -> ClientResult<Vec<Assignment>> {
        self.fetch(Self::get(Endpoint::CalendarAssignments)).await
    }
}

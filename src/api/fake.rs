//! In-memory portal backend used by the test suites

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::endpoint::Method;
use super::error::{ClientError, ClientResult};
use super::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Clone)]
struct FakeUser {
    id: i64,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    role: &'static str,
}

impl FakeUser {
    fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": format!("{}@uni.edu", self.username),
            "first_name": self.first_name,
            "last_name": self.last_name,
            "role": self.role,
        })
    }
}

#[derive(Clone)]
struct FakeProject {
    id: i64,
    name: String,
    description: String,
    course: String,
    capacity: u32,
    members: Vec<i64>,
}

#[derive(Default)]
struct World {
    users: Vec<FakeUser>,
    projects: Vec<FakeProject>,
    messages: Vec<(i64, Value)>,
    tasks: Vec<(i64, Value)>,
    milestones: Vec<(i64, Value)>,
    submissions: Vec<Value>,
    stories: Vec<Value>,
    crns: Vec<Value>,
    assignments: Vec<Value>,
    signed_in: Option<i64>,
    next_id: i64,
    include_members_in_listing: bool,
}

/// Scriptable fake backend.
///
/// Behaves like a small portal server (sessions, membership, CRUD) and lets
/// tests override individual routes or cut the network entirely.
pub struct FakePortal {
    world: RefCell<World>,
    overrides: RefCell<HashMap<(Method, String), (u16, String)>>,
    requests: RefCell<Vec<ApiRequest>>,
    offline: RefCell<bool>,
    cookie: RefCell<Option<String>>,
}

impl FakePortal {
    pub fn new() -> Self {
        let users = vec![
            fake_user(1, "ana", "Ana", "Ruiz", "student"),
            fake_user(2, "ben", "Ben", "Okafor", "student"),
            fake_user(10, "drxu", "Dana", "Xu", "faculty"),
        ];
        let projects = vec![
            fake_project(1, "Campus Navigator", "Indoor maps for campus", 3, vec![2]),
            fake_project(2, "Robotics Lab", "Line-following robot", 2, vec![]),
            fake_project(3, "Data Dashboard", "Charts for the registrar", 1, vec![2]),
        ];

        let world = World {
            users,
            projects,
            next_id: 100,
            include_members_in_listing: true,
            ..World::default()
        };

        Self {
            world: RefCell::new(world),
            overrides: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            offline: RefCell::new(false),
            cookie: RefCell::new(None),
        }
    }

    /// Start with a live session for `username`, as if the login already happened
    pub fn signed_in_as(username: &str) -> Self {
        let fake = Self::new();
        let id = fake
            .world
            .borrow()
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id);
        if let Some(id) = id {
            fake.resume_session(&format!("session=user-{id}"));
        }
        fake
    }

    /// Drop the server-side session, as if it expired
    pub fn expire_session(&self) {
        self.world.borrow_mut().signed_in = None;
    }

    /// Force a fixed answer for `method path` (path without query)
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.overrides
            .borrow_mut()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    /// Make every request fail before reaching the backend
    pub fn set_offline(&self, offline: bool) {
        *self.offline.borrow_mut() = offline;
    }

    /// Mimic the original backend, whose listing omits team members
    pub fn hide_members_in_listing(&self) {
        self.world.borrow_mut().include_members_in_listing = false;
    }

    /// Replace the seeded projects with `count` generated ones
    pub fn seed_projects(&self, count: usize) {
        let mut world = self.world.borrow_mut();
        world.projects = (1..=count as i64)
            .map(|i| fake_project(i, &format!("Project {i}"), "generated", 4, vec![]))
            .collect();
    }

    pub fn add_assignment(&self, id: i64, title: &str, due: &str) {
        self.world
            .borrow_mut()
            .assignments
            .push(json!({"id": id, "title": title, "due_date": due, "course": "CS 499"}));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// How many `method` requests hit a path ending in `suffix`
    pub fn sent(&self, method: Method, suffix: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(suffix))
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn members_of(&self, project_id: i64) -> Vec<i64> {
        self.world
            .borrow()
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.members.clone())
            .unwrap_or_default()
    }

    fn route(&self, request: &ApiRequest) -> (u16, Value) {
        let path = request.path.split('?').next().unwrap_or_default();
        let query = request.path.split_once('?').map(|(_, q)| q).unwrap_or("");
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);
        let mut world = self.world.borrow_mut();

        let public = matches!(segments.as_slice(), ["login"] | ["register"]);
        if !public && world.signed_in.is_none() {
            return (401, json!({"error": "Authentication required"}));
        }

        match (request.method, segments.as_slice()) {
            (Method::Post, ["login"]) => {
                let username = body["username"].as_str().unwrap_or_default();
                let password = body["password"].as_str().unwrap_or_default();
                match world
                    .users
                    .iter()
                    .find(|u| u.username == username && u.password == password)
                    .cloned()
                {
                    Some(user) => {
                        world.signed_in = Some(user.id);
                        *self.cookie.borrow_mut() = Some(format!("session=user-{}", user.id));
                        (200, json!({"message": "Login successful", "user": user.to_json()}))
                    }
                    None => (401, json!({"error": "Invalid credentials"})),
                }
            }
            (Method::Post, ["register"]) => {
                let username = body["username"].as_str().unwrap_or_default().to_string();
                if world.users.iter().any(|u| u.username == username) {
                    return (400, json!({"error": "Username already exists"}));
                }
                let id = world.bump();
                let role = if body["role"] == "faculty" { "faculty" } else { "student" };
                world.users.push(FakeUser {
                    id,
                    username,
                    password: body["password"].as_str().unwrap_or_default().to_string(),
                    first_name: body["first_name"].as_str().unwrap_or_default().to_string(),
                    last_name: body["last_name"].as_str().unwrap_or_default().to_string(),
                    role,
                });
                (201, json!({"message": "Registration successful", "user_id": id}))
            }
            (Method::Post, ["logout"]) => {
                world.signed_in = None;
                *self.cookie.borrow_mut() = None;
                (200, json!({"message": "Logout successful"}))
            }
            (Method::Get, ["user", "profile"]) => {
                let user = world.current_user();
                let mut profile = user.to_json();
                profile["biography"] = json!("Likes robots");
                profile["skills"] = json!("rust, sql");
                profile["interests"] = Value::Null;
                (200, profile)
            }
            (Method::Put, ["user", "profile"]) => {
                (200, json!({"message": "Profile updated successfully"}))
            }
            (Method::Get, ["students"]) => {
                let keyword = keyword_of(query);
                let students: Vec<Value> = world
                    .users
                    .iter()
                    .filter(|u| u.role == "student")
                    .filter(|u| keyword.is_empty() || u.name().to_lowercase().contains(&keyword))
                    .map(|u| json!({"id": u.id, "name": u.name(), "skills": "rust, sql", "biography": null}))
                    .collect();
                (200, json!(students))
            }
            (Method::Get, ["projects"]) => {
                let keyword = keyword_of(query);
                let listing: Vec<Value> = world
                    .projects
                    .iter()
                    .filter(|p| {
                        keyword.is_empty()
                            || p.name.to_lowercase().contains(&keyword)
                            || p.description.to_lowercase().contains(&keyword)
                    })
                    .map(|p| world.project_json(p, world.include_members_in_listing))
                    .collect();
                (200, json!(listing))
            }
            (Method::Post, ["projects"]) => {
                if world.current_user().role != "faculty" {
                    return (403, json!({"error": "Only faculty can create projects"}));
                }
                let id = world.bump();
                world.projects.push(FakeProject {
                    id,
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    description: body["description"].as_str().unwrap_or_default().to_string(),
                    course: body["course"].as_str().unwrap_or_default().to_string(),
                    capacity: body["capacity"].as_u64().unwrap_or(0) as u32,
                    members: Vec::new(),
                });
                (201, json!({"message": "Project created successfully", "project_id": id}))
            }
            (Method::Get, ["projects", id]) => match world.find_project(id) {
                Some(p) => (200, world.project_json(&p, true)),
                None => (404, json!({"error": "Not found"})),
            },
            (Method::Post, ["projects", id, "join"]) => {
                let user = world.current_user();
                if user.role != "student" {
                    return (403, json!({"error": "Only students can join projects"}));
                }
                let Some(project) = world.projects.iter_mut().find(|p| p.id.to_string() == *id) else {
                    return (404, json!({"error": "Not found"}));
                };
                if project.members.contains(&user.id) {
                    return (400, json!({"error": "Already a member of this project"}));
                }
                if project.members.len() as u32 >= project.capacity {
                    return (400, json!({"error": "Project is full"}));
                }
                project.members.push(user.id);
                (200, json!({"message": "Successfully joined project"}))
            }
            (Method::Post, ["projects", id, "leave"]) => {
                let user_id = world.current_user().id;
                let Some(project) = world.projects.iter_mut().find(|p| p.id.to_string() == *id) else {
                    return (404, json!({"error": "Not found"}));
                };
                if !project.members.contains(&user_id) {
                    return (400, json!({"error": "Not a member of this project"}));
                }
                project.members.retain(|m| *m != user_id);
                (200, json!({"message": "Successfully left project"}))
            }
            (Method::Get, ["projects", id, "messages"]) => (200, world.scoped(&world.messages, id)),
            (Method::Post, ["projects", id, "messages"]) => {
                let user = world.current_user();
                let msg_id = world.bump();
                // Newest first so the client has to order them
                let created_at = format!("2025-03-01T10:{:02}:00", msg_id % 60);
                world.messages.insert(
                    0,
                    (
                        parse_id(id),
                        json!({
                            "id": msg_id,
                            "sender": {"id": user.id, "name": user.name()},
                            "content": body["content"],
                            "message_type": body["message_type"],
                            "created_at": created_at,
                        }),
                    ),
                );
                (201, json!({"message": "Message sent successfully"}))
            }
            (Method::Get, ["projects", id, "tasks"]) => (200, world.scoped(&world.tasks, id)),
            (Method::Post, ["projects", id, "tasks"]) => {
                let task_id = world.bump();
                world.tasks.push((
                    parse_id(id),
                    json!({
                        "id": task_id,
                        "title": body["title"],
                        "description": body["description"],
                        "status": "pending",
                        "assignee": null,
                        "due_date": body["due_date"],
                    }),
                ));
                (201, json!({"message": "Task created successfully", "task_id": task_id}))
            }
            (Method::Put, ["tasks", id]) => {
                let status = body["status"].clone();
                match world.tasks.iter_mut().find(|(_, t)| t["id"].to_string() == *id) {
                    Some((_, task)) => {
                        task["status"] = status;
                        (200, json!({"message": "Task updated successfully"}))
                    }
                    None => (404, json!({"error": "Not found"})),
                }
            }
            (Method::Get, ["projects", id, "milestones"]) => (200, world.scoped(&world.milestones, id)),
            (Method::Post, ["projects", id, "milestones"]) => {
                let milestone_id = world.bump();
                world.milestones.push((
                    parse_id(id),
                    json!({
                        "id": milestone_id,
                        "title": body["title"],
                        "description": body["description"],
                        "due_date": body["due_date"],
                        "status": "upcoming",
                    }),
                ));
                (201, json!({"message": "Milestone created successfully"}))
            }
            (Method::Get, ["custom-projects"]) => (200, json!(world.submissions)),
            (Method::Post, ["custom-projects"]) => {
                let user = world.current_user();
                let id = world.bump();
                let mut submission = body.clone();
                submission["id"] = json!(id);
                submission["status"] = json!("pending");
                submission["submitter_name"] = json!(user.name());
                world.submissions.push(submission);
                (201, json!({"message": "Submitted"}))
            }
            (Method::Put, ["custom-projects", id]) => {
                let decision = body["status"].as_str().unwrap_or_default().to_string();
                let Some(submission) = world
                    .submissions
                    .iter_mut()
                    .find(|s| s["id"].to_string() == *id)
                else {
                    return (404, json!({"error": "Not found"}));
                };
                submission["status"] = json!(decision);
                let approved = submission.clone();
                if decision == "approved" {
                    let project_id = world.bump();
                    world.projects.push(FakeProject {
                        id: project_id,
                        name: approved["name"].as_str().unwrap_or_default().to_string(),
                        description: approved["description"].as_str().unwrap_or_default().to_string(),
                        course: approved["course"].as_str().unwrap_or_default().to_string(),
                        capacity: approved["capacity"].as_u64().unwrap_or(1) as u32,
                        members: Vec::new(),
                    });
                }
                (200, json!({"message": format!("Submission {decision}")}))
            }
            (Method::Get, ["user-stories"]) => {
                let wanted = query
                    .split('&')
                    .find_map(|kv| kv.strip_prefix("project_id="))
                    .map(|v| v.to_string());
                let stories: Vec<Value> = world
                    .stories
                    .iter()
                    .filter(|s| match &wanted {
                        Some(id) => s["project_id"].to_string() == *id,
                        None => true,
                    })
                    .cloned()
                    .collect();
                (200, json!(stories))
            }
            (Method::Post, ["user-stories"]) => {
                let user = world.current_user();
                let id = world.bump();
                let mut story = body.clone();
                story["id"] = json!(id);
                story["author"] = json!(user.name());
                world.stories.push(story);
                (201, json!({"message": "Posted"}))
            }
            (Method::Delete, ["user-stories", id]) => {
                let before = world.stories.len();
                world.stories.retain(|s| s["id"].to_string() != *id);
                if world.stories.len() == before {
                    (404, json!({"error": "Not found"}))
                } else {
                    (200, json!({"message": "Deleted"}))
                }
            }
            (Method::Get, ["crns"]) => (200, json!(world.crns)),
            (Method::Post, ["crns"]) => {
                let user = world.current_user();
                let id = world.bump();
                let mut crn = body.clone();
                crn["id"] = json!(id);
                crn["faculty_name"] = json!(user.name());
                world.crns.push(crn);
                (201, json!({"message": "Created"}))
            }
            (Method::Delete, ["crns", id]) => {
                world.crns.retain(|c| c["id"].to_string() != *id);
                (200, json!({"message": "Deleted"}))
            }
            (Method::Get, ["calendar", "assignments"]) => (200, json!(world.assignments)),
            _ => (404, json!({"error": "Not found"})),
        }
    }
}

impl World {
    fn bump(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn current_user(&self) -> FakeUser {
        let id = self.signed_in.unwrap_or_default();
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .unwrap_or_else(|| self.users[0].clone())
    }

    fn find_project(&self, id: &str) -> Option<FakeProject> {
        self.projects.iter().find(|p| p.id.to_string() == id).cloned()
    }

    fn project_json(&self, p: &FakeProject, with_members: bool) -> Value {
        let full = p.members.len() as u32 >= p.capacity;
        let mut value = json!({
            "id": p.id,
            "name": p.name,
            "description": p.description,
            "capacity": p.capacity,
            "course": p.course,
            "status": if full { "full" } else { "open" },
            "current_members": p.members.len(),
            "creator": {"id": 10, "name": "Dana Xu", "title": "Dr."},
            "created_at": "2025-01-15T09:00:00",
        });
        if with_members {
            let members: Vec<Value> = p
                .members
                .iter()
                .filter_map(|id| self.users.iter().find(|u| u.id == *id))
                .map(|u| json!({"id": u.id, "name": u.name(), "skills": null, "joined_at": "2025-02-01T12:00:00"}))
                .collect();
            value["team_members"] = json!(members);
        }
        value
    }

    fn scoped(&self, records: &[(i64, Value)], id: &str) -> Value {
        let id = parse_id(id);
        json!(records
            .iter()
            .filter(|(project, _)| *project == id)
            .map(|(_, v)| v.clone())
            .collect::<Vec<_>>())
    }
}

#[async_trait(?Send)]
impl Transport for FakePortal {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());

        if *self.offline.borrow() {
            return Err(ClientError::Transport("connection refused".into()));
        }

        let path = request.path.split('?').next().unwrap_or_default().to_string();
        if let Some((status, body)) = self.overrides.borrow().get(&(request.method, path)) {
            return Ok(ApiResponse::new(*status, body.clone()));
        }

        let (status, body) = self.route(&request);
        Ok(ApiResponse::new(status, body.to_string()))
    }

    fn session_token(&self) -> Option<String> {
        self.cookie.borrow().clone()
    }

    fn resume_session(&self, token: &str) {
        *self.cookie.borrow_mut() = Some(token.to_string());
        let user_id = token
            .strip_prefix("session=user-")
            .and_then(|id| id.parse().ok());
        self.world.borrow_mut().signed_in = user_id;
    }

    fn forget_session(&self) {
        *self.cookie.borrow_mut() = None;
    }
}

fn fake_user(id: i64, username: &str, first: &str, last: &str, role: &'static str) -> FakeUser {
    FakeUser {
        id,
        username: username.to_string(),
        password: "secret".to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role,
    }
}

fn fake_project(id: i64, name: &str, description: &str, capacity: u32, members: Vec<i64>) -> FakeProject {
    FakeProject {
        id,
        name: name.to_string(),
        description: description.to_string(),
        course: "CS 499".to_string(),
        capacity,
        members,
    }
}

fn parse_id(raw: &str) -> i64 {
    raw.parse().unwrap_or_default()
}

fn keyword_of(query: &str) -> String {
    query
        .split('&')
        .find_map(|kv| kv.strip_prefix("keyword="))
        .map(|v| urlencoding::decode(v).map(|s| s.into_owned()).unwrap_or_default())
        .unwrap_or_default()
        .to_lowercase()
}

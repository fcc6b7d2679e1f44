//! Transport seam
//!
//! The typed client only needs "send this JSON request, give me status and
//! body back". Native builds use reqwest, the browser build uses fetch, tests
//! use an in-memory fake.

use async_trait::async_trait;

use super::endpoint::Method;
use super::error::ClientResult;

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus optional query string, e.g. `/projects?keyword=ai`
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw backend answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend with the session credentials attached.
///
/// Futures are not required to be `Send` so that browser fetch futures can
/// implement this as well.
#[async_trait(?Send)]
pub trait Transport {
    /// Send a request; `Err` only for failures that produced no response
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;

    /// Current session credential, if the transport manages one itself
    fn session_token(&self) -> Option<String> {
        None
    }

    /// Re-attach a credential previously returned by [`session_token`]
    ///
    /// [`session_token`]: Transport::session_token
    fn resume_session(&self, _token: &str) {}

    /// Drop any held credential
    fn forget_session(&self) {}
}

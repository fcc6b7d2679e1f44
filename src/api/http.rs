//! reqwest transport with a cookie jar
//!
//! The backend keeps the session in a cookie. The jar is exposed through the
//! session hooks so the CLI can persist it between invocations.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};

use super::endpoint::{join_url, Method};
use super::error::{ClientError, ClientResult};
use super::transport::{ApiRequest, ApiResponse, Transport};

struct Session {
    client: Client,
    jar: Arc<Jar>,
}

/// HTTP transport for native builds
pub struct HttpTransport {
    base_url: String,
    origin: Url,
    timeout: Option<Duration>,
    session: RefCell<Session>,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let origin = Url::parse(base_url)
            .map_err(|e| ClientError::Transport(format!("invalid base URL {base_url}: {e}")))?;
        let session = Self::build_session(timeout)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            origin,
            timeout,
            session: RefCell::new(session),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_session(timeout: Option<Duration>) -> ClientResult<Session> {
        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Session { client, jar })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = join_url(&self.base_url, &request.path);
        let client = self.session.borrow().client.clone();

        let builder = match request.method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
            Method::Put => client.put(&url),
            Method::Delete => client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "request failed");
            if e.is_timeout() {
                ClientError::Transport("request timed out".into())
            } else {
                ClientError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiResponse::new(status, body))
    }

    fn session_token(&self) -> Option<String> {
        let session = self.session.borrow();
        session
            .jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|cookies| !cookies.is_empty())
    }

    fn resume_session(&self, token: &str) {
        let session = self.session.borrow();
        for cookie in token.split("; ").filter(|c| !c.trim().is_empty()) {
            session.jar.add_cookie_str(cookie, &self.origin);
        }
    }

    fn forget_session(&self) {
        // A jar cannot be emptied in place, so start over with a fresh client
        match Self::build_session(self.timeout) {
            Ok(fresh) => *self.session.borrow_mut() = fresh,
            Err(e) => tracing::warn!(error = %e, "could not reset cookie jar"),
        }
    }
}

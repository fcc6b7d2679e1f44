//! Fetch transport
//!
//! Talks to the portal backend from the browser. The session cookie is owned
//! by the browser; every request goes out with credentials included so it is
//! attached cross-origin.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use web_sys::RequestCredentials;

use portal::api::{join_url, ApiRequest, ApiResponse, ClientError, ClientResult, Method, Transport};

const API_URL_KEY: &str = "portal_api_url";
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// API base URL. Point the app at another server by setting
/// `portal_api_url` in localStorage and reloading.
pub fn get_api_base() -> String {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// `fetch`-backed [`Transport`]
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Transport for the configured API base
    pub fn from_storage() -> Self {
        Self::new(get_api_base())
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        };
        builder.credentials(RequestCredentials::Include)
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = join_url(&self.base_url, &request.path);
        let builder = self.builder(request.method, &url);

        let request = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| ClientError::Transport(format!("Request build error: {e}")))?,
            None => builder
                .build()
                .map_err(|e| ClientError::Transport(format!("Request build error: {e}")))?,
        };

        let response = request.send().await.map_err(|e| {
            web_sys::console::error_1(&format!("{url}: {e}").into());
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(ApiResponse::new(status, body))
    }
}

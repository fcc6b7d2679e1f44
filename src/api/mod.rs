//! Portal REST API
//!
//! Typed access to the collaboration portal backend.
//!
//! # Endpoints
//!
//! ## Session
//! - `POST /login`, `POST /register`, `POST /logout`
//!
//! ## People
//! - `GET/PUT /user/profile`
//! - `GET /students?keyword=`
//!
//! ## Projects
//! - `GET/POST /projects`, `GET /projects/:id`
//! - `POST /projects/:id/join`, `POST /projects/:id/leave`
//! - `GET/POST /projects/:id/messages|tasks|milestones`, `PUT /tasks/:id`
//!
//! ## Section management
//! - `GET/POST /custom-projects`, `PUT /custom-projects/:id`
//! - `GET/POST /user-stories`, `DELETE /user-stories/:id`
//! - `GET/POST /crns`, `DELETE /crns/:id`
//! - `GET /calendar/assignments`
//!
//! Requests go through a [`Transport`]; the session lives in a cookie that
//! the transport carries.

pub mod client;
pub mod endpoint;
pub mod error;
#[cfg(feature = "native")]
pub mod http;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use client::PortalApi;
pub use endpoint::{join_url, with_query, Endpoint, Method};
pub use error::{ClientError, ClientResult, GENERIC_ERROR};
#[cfg(feature = "native")]
pub use http::HttpTransport;
pub use transport::{ApiRequest, ApiResponse, Transport};

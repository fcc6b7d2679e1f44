//! # Portal
//!
//! Client core for the university project-collaboration portal: students
//! join group projects, chat with teammates and track tasks and milestones;
//! faculty run course sections, review project proposals and post
//! announcements.
//!
//! ## Modules
//!
//! - [`api`]: typed REST client over a pluggable transport
//! - [`model`]: records exchanged with the backend
//! - [`forms`]: form input normalization
//! - [`membership`]: join/leave rules
//! - [`pagination`], [`calendar`]: view helpers
//! - [`state`]: the application state container
//! - [`dashboard`]: the controller that drives it
//! - [`session`]: durable session storage
//!
//! The crate builds without the `native` feature for the browser front-end;
//! `native` adds the reqwest transport, configuration and the CLI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use portal::api::HttpTransport;
//! use portal::forms::LoginForm;
//! use portal::session::FileSessionStore;
//! use portal::state::View;
//! use portal::Dashboard;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("http://localhost:5000/api", None)?;
//!     let mut dashboard = Dashboard::new(transport, FileSessionStore::new("session.json"));
//!
//!     dashboard
//!         .login(&LoginForm {
//!             username: "ana".into(),
//!             password: "secret".into(),
//!         })
//!         .await?;
//!
//!     dashboard.show_view(View::Projects).await?;
//!     for project in dashboard.state().directory().current() {
//!         println!("{} ({})", project.name, project.occupancy());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod calendar;
#[cfg(feature = "native")]
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod membership;
pub mod model;
pub mod pagination;
pub mod session;
pub mod state;

// Re-export top-level types for convenience
pub use api::{ClientError, ClientResult, PortalApi, Transport};

pub use dashboard::Dashboard;

pub use forms::FormError;

pub use session::{MemorySessionStore, SessionError, SessionStore, StoredSession};

pub use state::{AppState, Notice, NoticeLevel, Page, ProjectTab, View};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};

//! Client Error Types
//!
//! Every failure a dashboard action can run into, and the text shown to the
//! user for it.

use thiserror::Error;

use crate::forms::FormError;
use crate::session::SessionError;

/// Text shown when nothing more specific is available
pub const GENERIC_ERROR: &str = "An error occurred";

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request never produced a response (connection refused, DNS, CORS...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// Form input rejected before any request was made
    #[error("Invalid input: {0}")]
    Form(#[from] FormError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("No project is open")]
    NoProjectOpen,

    /// Action is not available in the current state
    #[error("{0}")]
    NotAllowed(String),

    /// Destructive action attempted without confirmation
    #[error("Action requires confirmation")]
    Unconfirmed,

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Message for the user: the server-supplied text when there is one,
    /// otherwise `fallback` for HTTP errors and the generic text for
    /// everything that never reached the backend.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Status {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            ClientError::Status { .. } => fallback.to_string(),
            ClientError::Transport(_) | ClientError::Decode(_) | ClientError::Session(_) => {
                GENERIC_ERROR.to_string()
            }
            ClientError::Form(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

//! Durable session record
//!
//! The signed-in user is mirrored to on-device storage so a restart can skip
//! the login screen. The record is trusted as-is; nothing is revalidated
//! against the backend until a request fails.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::User;

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored session is unreadable: {0}")]
    Encoding(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// What survives a restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    /// Transport credential (cookie header) when the transport exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl StoredSession {
    pub fn new(user: User) -> Self {
        Self { user, cookie: None }
    }

    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }
}

/// Durable storage for one [`StoredSession`]
pub trait SessionStore {
    fn load(&self) -> SessionResult<Option<StoredSession>>;
    fn save(&self, session: &StoredSession) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Process-lifetime store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RefCell<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<StoredSession>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        *self.slot.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// JSON file store used by the CLI
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionResult<Option<StoredSession>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Encoding(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = ?self.path, "session saved");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

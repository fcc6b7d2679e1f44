//! localStorage-backed session record

use portal::model::User;
use portal::session::{SessionError, SessionResult, SessionStore, StoredSession};
use web_sys::Storage;

/// Key the signed-in user is kept under
pub const USER_KEY: &str = "user";

/// Keeps the signed-in user in `localStorage`; the cookie stays with the
/// browser.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageSessionStore;

impl LocalStorageSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> SessionResult<Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| SessionError::Unavailable("localStorage is not available".to_string()))
    }
}

fn js_error(err: wasm_bindgen::JsValue) -> SessionError {
    SessionError::Unavailable(format!("{err:?}"))
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> SessionResult<Option<StoredSession>> {
        let Some(raw) = self.storage()?.get_item(USER_KEY).map_err(js_error)? else {
            return Ok(None);
        };
        let user: User =
            serde_json::from_str(&raw).map_err(|e| SessionError::Encoding(e.to_string()))?;
        Ok(Some(StoredSession::new(user)))
    }

    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        let raw = serde_json::to_string(&session.user)
            .map_err(|e| SessionError::Encoding(e.to_string()))?;
        self.storage()?.set_item(USER_KEY, &raw).map_err(js_error)
    }

    fn clear(&self) -> SessionResult<()> {
        self.storage()?.remove_item(USER_KEY).map_err(js_error)
    }
}

//! Global Application State
//!
//! The [`Dashboard`] controller owns the real state. Components see a
//! reactive snapshot of it that is republished after every action.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use leptos::*;
use tokio::sync::Mutex;

use portal::{AppState, ClientResult, Dashboard, NoticeLevel};

use crate::api::GlooTransport;
use crate::dom;
use crate::session::LocalStorageSessionStore;

pub type UiDashboard = Dashboard<GlooTransport, LocalStorageSessionStore>;

/// Future returned by a dashboard action
pub type Action<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Keep a failed action in the console. The user already got its notice,
/// if it produced one.
pub fn log_failure<T>(action: &str, result: ClientResult<T>) {
    if let Err(err) = result {
        web_sys::console::warn_1(&format!("{action} failed: {err}").into());
    }
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Snapshot of the controller state
    pub app: RwSignal<AppState>,
    /// Actions started but not yet finished
    pub pending: RwSignal<u32>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    dashboard: StoredValue<Rc<Mutex<UiDashboard>>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() -> GlobalState {
    let dashboard = Dashboard::new(GlooTransport::from_storage(), LocalStorageSessionStore::new());

    let state = GlobalState {
        app: create_rw_signal(dashboard.state().clone()),
        pending: create_rw_signal(0),
        success: create_rw_signal(None),
        dashboard: store_value(Rc::new(Mutex::new(dashboard))),
    };

    provide_context(state);
    state
}

impl GlobalState {
    /// Run `action` against the controller, then publish the result.
    ///
    /// Actions run one at a time in the order they were dispatched.
    pub fn dispatch<F>(self, action: F)
    where
        F: for<'a> FnOnce(&'a mut UiDashboard) -> Action<'a> + 'static,
    {
        let dashboard = self.dashboard.get_value();
        self.pending.update(|n| *n += 1);

        spawn_local(async move {
            let mut guard = dashboard.lock().await;
            action(&mut *guard).await;
            self.publish(&mut *guard);
            self.pending.update(|n| *n = n.saturating_sub(1));
        });
    }

    fn publish(self, dashboard: &mut UiDashboard) {
        let notices = dashboard.take_notices();
        self.app.set(dashboard.state().clone());

        for notice in notices {
            match notice.level {
                NoticeLevel::Success => self.show_success(&notice.text),
                NoticeLevel::Error => {
                    web_sys::console::error_1(&notice.text.clone().into());
                    dom::alert(&notice.text);
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.get() > 0
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }
}

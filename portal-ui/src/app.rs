//! App Root Component
//!
//! Picks the screen from the controller's page and, on the dashboard, the
//! single visible section.

use leptos::*;

use portal::{Page, View};

use crate::components::{Nav, ProjectModal, Toast};
use crate::pages::{
    Announcements, Calendar, Login, Overview, Profile, Projects, Register, Sections, Students,
};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_global_state();

    // A remembered user skips the login screen
    state.dispatch(|d| {
        Box::pin(async move {
            if d.restore_session().is_some() {
                log_failure("show view", d.show_view(View::Overview).await);
            }
        })
    });

    let page = create_memo(move |_| state.app.with(|app| app.page()));

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            {move || match page.get() {
                Page::Login => view! { <Login /> }.into_view(),
                Page::Register => view! { <Register /> }.into_view(),
                Page::Dashboard => view! { <Shell /> }.into_view(),
            }}

            // Toast notifications
            <Toast />
        </div>
    }
}

/// Signed-in layout
#[component]
fn Shell() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let section = create_memo(move |_| state.app.with(|app| app.view()));

    view! {
        <Nav />

        <main class="flex-1 container mx-auto px-4 py-8 pb-24">
            {move || match section.get() {
                View::Overview => view! { <Overview /> }.into_view(),
                View::Projects => view! { <Projects /> }.into_view(),
                View::Students => view! { <Students /> }.into_view(),
                View::Announcements => view! { <Announcements /> }.into_view(),
                View::Calendar => view! { <Calendar /> }.into_view(),
                View::Sections => view! { <Sections /> }.into_view(),
                View::Profile => view! { <Profile /> }.into_view(),
            }}
        </main>

        // Project detail overlay
        <ProjectModal />
    }
}

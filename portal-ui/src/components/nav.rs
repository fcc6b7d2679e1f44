//! Navigation Component
//!
//! Header bar with the dashboard sections and the sign-out button.

use leptos::*;

use portal::View;

use super::InlineLoading;
use crate::state::global::{log_failure, GlobalState};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let user_name = move || {
        state.app.with(|app| {
            app.user()
                .map(|u| format!("{} ({})", u.full_name(), u.role))
                .unwrap_or_default()
        })
    };

    let logout = move |_| {
        state.dispatch(|d| Box::pin(async move { d.logout().await }));
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <div class="flex items-center space-x-3">
                        <span class="text-2xl">"🎓"</span>
                        <span class="text-xl font-bold text-white">"Portal"</span>
                    </div>

                    // Section toggles
                    <div class="flex items-center space-x-1">
                        {View::ALL.into_iter().map(|view| view! { <NavButton view=view /> }).collect_view()}
                    </div>

                    <div class="flex items-center space-x-3 text-sm">
                        {move || state.is_busy().then(|| view! { <InlineLoading /> })}
                        <span class="text-gray-400">{user_name}</span>
                        <button
                            on:click=logout
                            class="px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 transition-colors"
                        >
                            "Logout"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Exactly one section is active; selecting one refetches it
#[component]
fn NavButton(view: View) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let active = create_memo(move |_| state.app.with(|app| app.view() == view));

    let select = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("show view", d.show_view(view).await);
            })
        });
    };

    view! {
        <button
            on:click=select
            class=move || {
                let base = "px-4 py-2 rounded-lg transition-colors";
                if active.get() {
                    format!("{} bg-gray-700 text-white", base)
                } else {
                    format!("{} text-gray-300 hover:text-white hover:bg-gray-700", base)
                }
            }
        >
            {view.label()}
        </button>
    }
}

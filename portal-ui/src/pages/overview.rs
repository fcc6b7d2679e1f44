//! Overview Page
//!
//! Greeting and the projects the user belongs to.

use leptos::*;

use crate::pages::ProjectCard;
use crate::state::global::GlobalState;

#[component]
pub fn Overview() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let greeting = move || {
        state.app.with(|app| {
            app.user()
                .map(|u| format!("Welcome, {}", u.first_name))
                .unwrap_or_default()
        })
    };
    let my_projects = move || state.app.with(|app| app.my_projects().to_vec());

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{greeting}</h1>
                <p class="text-gray-400 mt-1">"Your projects at a glance"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">
                    {move || format!("My Projects ({})", my_projects().len())}
                </h2>
                {move || {
                    let projects = my_projects();
                    if projects.is_empty() {
                        view! {
                            <p class="text-gray-400">"You are not on any project yet. Browse Projects to join one."</p>
                        }.into_view()
                    } else {
                        view! {
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                                {projects.into_iter().map(|p| view! { <ProjectCard project=p /> }).collect_view()}
                            </div>
                        }.into_view()
                    }
                }}
            </section>
        </div>
    }
}

//! Student directory

use leptos::*;

use crate::components::INPUT_CLASS;
use crate::state::global::{log_failure, GlobalState};

#[component]
pub fn Students() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let students = move || state.app.with(|app| app.students().to_vec());

    let on_search = move |ev: web_sys::Event| {
        let keyword = event_target_value(&ev);
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("load students", d.load_students(Some(&keyword)).await);
            })
        });
    };

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold">"Students"</h1>
                <p class="text-gray-400 mt-1">"Find teammates by skill or interest"</p>
            </div>

            <input type="search" placeholder="Search students..." class=INPUT_CLASS on:input=on_search />

            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                {move || students().into_iter().map(|student| {
                    let tags: Vec<String> = student.skill_tags().into_iter().map(str::to_string).collect();
                    view! {
                        <div class="bg-gray-800 rounded-lg p-4 space-y-2">
                            <h3 class="font-semibold">{student.name}</h3>
                            <div class="flex flex-wrap gap-1">
                                {tags.into_iter().map(|tag| view! {
                                    <span class="text-xs bg-gray-700 rounded px-2 py-1">{tag}</span>
                                }).collect_view()}
                            </div>
                            {student.interests.map(|i| view! {
                                <p class="text-sm text-gray-400">{format!("Interests: {}", i)}</p>
                            })}
                            {student.biography.map(|b| view! {
                                <p class="text-sm text-gray-300">{b}</p>
                            })}
                        </div>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

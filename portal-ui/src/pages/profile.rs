//! Profile Page

use leptos::*;

use portal::forms::ProfileForm;

use crate::components::{SubmitButton, TextArea, TextInput};
use crate::state::global::{log_failure, GlobalState};

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let biography = create_rw_signal(String::new());
    let skills = create_rw_signal(String::new());
    let interests = create_rw_signal(String::new());

    let profile = create_memo(move |_| state.app.with(|app| app.profile().cloned()));

    // Refill the form whenever a different profile arrives
    create_effect(move |_| {
        let form = profile
            .with(|p| p.as_ref().map(ProfileForm::from_profile))
            .unwrap_or_default();
        biography.set(form.biography);
        skills.set(form.skills);
        interests.set(form.interests);
    });

    let header = move || {
        profile.with(|p| {
            p.as_ref()
                .map(|p| {
                    let email = p.email.clone().unwrap_or_default();
                    format!("{} · {} · {}", p.full_name(), p.role, email)
                })
                .unwrap_or_default()
        })
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ProfileForm {
            biography: biography.get(),
            skills: skills.get(),
            interests: interests.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("update profile", d.update_profile(&form).await);
            })
        });
    };

    view! {
        <div class="space-y-6 max-w-2xl">
            <div>
                <h1 class="text-3xl font-bold">"Profile"</h1>
                <p class="text-gray-400 mt-1">{header}</p>
            </div>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                <TextArea label="Biography" value=biography rows=4 />
                <TextInput label="Skills" value=skills placeholder="Comma separated, e.g. Rust, SQL" />
                <TextInput label="Interests" value=interests />
                <SubmitButton label="Save Profile" />
            </form>
        </div>
    }
}

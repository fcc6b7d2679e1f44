//! Announcements Page
//!
//! Section-wide and project announcements, with a filter by project.

use leptos::*;

use portal::forms::AnnouncementForm;
use portal::model::time::format_datetime;
use portal::model::{Id, Priority};

use crate::components::{clear, SelectInput, SubmitButton, TextArea, TextInput, INPUT_CLASS};
use crate::state::global::{log_failure, GlobalState};

#[component]
pub fn Announcements() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let announcements = move || state.app.with(|app| app.announcements().to_vec());

    let on_filter = move |ev: web_sys::Event| {
        let scope: Option<Id> = event_target_value(&ev).parse().ok();
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("load announcements", d.load_announcements(scope).await);
            })
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Announcements"</h1>
                    <p class="text-gray-400 mt-1">"News for your section and projects"</p>
                </div>
                <select class={INPUT_CLASS.replace("w-full", "w-64")} on:change=on_filter>
                    <option value="">"All announcements"</option>
                    {move || project_options(state).into_iter().map(|(value, label)| {
                        let selected = state.app.with(|app| {
                            app.announcement_scope().map(|id| id.to_string()) == Some(value.clone())
                        });
                        view! { <option value=value selected=selected>{label}</option> }
                    }).collect_view()}
                </select>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-2 space-y-4">
                    {move || {
                        let items = announcements();
                        if items.is_empty() {
                            view! { <p class="text-gray-400">"No announcements"</p> }.into_view()
                        } else {
                            items.into_iter().map(|a| view! { <AnnouncementCard announcement=a /> }).collect_view()
                        }
                    }}
                </div>
                <PostForm />
            </div>
        </div>
    }
}

/// Projects the user can scope an announcement to
fn project_options(state: GlobalState) -> Vec<(String, String)> {
    state.app.with(|app| {
        let mut options: Vec<(String, String)> = Vec::new();
        let known = app.my_projects().iter().chain(app.directory().items());
        for project in known {
            let value = project.id.to_string();
            if !options.iter().any(|(v, _)| *v == value) {
                options.push((value, project.name.clone()));
            }
        }
        options
    })
}

#[component]
fn AnnouncementCard(announcement: portal::model::Announcement) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = announcement.id;

    let delete = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("delete announcement", d.delete_announcement(id).await);
            })
        });
    };

    let border = if announcement.priority == Priority::High {
        "border-l-4 border-red-500"
    } else {
        "border-l-4 border-gray-600"
    };

    view! {
        <div class=format!("bg-gray-800 rounded-lg p-4 {}", border)>
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="font-semibold">{announcement.title.clone()}</h3>
                    <div class="text-xs text-gray-400 space-x-2">
                        <span>{announcement.scope_label()}</span>
                        <span>{announcement.story_type.clone()}</span>
                        <span>{announcement.author.clone().unwrap_or_default()}</span>
                        <span>{announcement.created_at.as_ref().map(format_datetime)}</span>
                    </div>
                </div>
                <button class="text-sm text-red-400 hover:text-red-300" on:click=delete>"Delete"</button>
            </div>
            <p class="text-sm text-gray-300 mt-2 whitespace-pre-line">{announcement.content.clone()}</p>
        </div>
    }
}

#[component]
fn PostForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let title = create_rw_signal(String::new());
    let content = create_rw_signal(String::new());
    let story_type = create_rw_signal("announcement".to_string());
    let priority = create_rw_signal("normal".to_string());
    let project_id = create_rw_signal(String::new());

    let types = Signal::derive(|| {
        ["announcement", "update", "event", "reminder"]
            .into_iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect()
    });
    let priorities = Signal::derive(|| {
        vec![
            ("normal".to_string(), "Normal".to_string()),
            ("high".to_string(), "High".to_string()),
        ]
    });
    let scopes = Signal::derive(move || {
        let is_student = state.app.with(|app| app.user().is_some_and(|u| u.is_student()));
        let blank = if is_student { "Select a project" } else { "Section-wide" };
        let mut options = vec![(String::new(), blank.to_string())];
        options.extend(project_options(state));
        options
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = AnnouncementForm {
            title: title.get(),
            content: content.get(),
            story_type: story_type.get(),
            priority: priority.get(),
            project_id: project_id.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.post_announcement(&form).await.is_ok() {
                    clear(&[title, content]);
                }
            })
        });
    };

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4 h-fit">
            <h2 class="text-xl font-semibold">"Post Announcement"</h2>
            <TextInput label="Title" value=title />
            <TextArea label="Content" value=content rows=4 />
            <SelectInput label="Type" value=story_type options=types />
            <SelectInput label="Priority" value=priority options=priorities />
            <SelectInput label="Project" value=project_id options=scopes />
            <SubmitButton label="Post" />
        </form>
    }
}

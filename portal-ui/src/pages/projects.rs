//! Projects Page
//!
//! Searchable, paginated project directory. Faculty can add projects.

use leptos::*;

use portal::forms::ProjectForm;
use portal::model::{Project, ProjectStatus};

use crate::components::{clear, Modal, SubmitButton, TextArea, TextInput, INPUT_CLASS};
use crate::state::global::{log_failure, GlobalState};

#[component]
pub fn Projects() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let creating = create_rw_signal(false);

    let is_faculty = move || state.app.with(|app| app.user().is_some_and(|u| u.is_faculty()));
    let page_items = move || state.app.with(|app| app.directory().current().to_vec());

    // Every keystroke is its own request
    let on_search = move |ev: web_sys::Event| {
        let keyword = event_target_value(&ev);
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("search projects", d.search_projects(&keyword).await);
            })
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Projects"</h1>
                    <p class="text-gray-400 mt-1">"Browse and join group projects"</p>
                </div>
                {move || is_faculty().then(|| view! {
                    <button
                        on:click=move |_| creating.set(true)
                        class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 font-medium"
                    >
                        "Create Project"
                    </button>
                })}
            </div>

            <input
                type="search"
                placeholder="Search projects..."
                class=INPUT_CLASS
                on:input=on_search
            />

            {move || {
                let projects = page_items();
                if projects.is_empty() {
                    view! { <p class="text-gray-400">"No projects found"</p> }.into_view()
                } else {
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                            {projects.into_iter().map(|p| view! { <ProjectCard project=p /> }).collect_view()}
                        </div>
                    }.into_view()
                }
            }}

            <PageControls />

            <Modal title="Create Project" open=creating>
                <CreateProjectForm open=creating />
            </Modal>
        </div>
    }
}

/// Card that opens the project's detail view
#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = project.id;

    let open = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("open project", d.open_project(id).await);
            })
        });
    };

    let (badge, badge_class) = match project.effective_status() {
        ProjectStatus::Open => ("Open", "bg-green-600"),
        ProjectStatus::Full => ("Full", "bg-red-600"),
    };

    view! {
        <div
            on:click=open
            class="bg-gray-800 hover:bg-gray-700 rounded-lg p-4 cursor-pointer transition-colors"
        >
            <div class="flex items-start justify-between mb-2">
                <h3 class="font-semibold">{project.name.clone()}</h3>
                <span class=format!("text-xs px-2 py-1 rounded {}", badge_class)>{badge}</span>
            </div>
            <p class="text-sm text-gray-400 mb-3 line-clamp-2">{project.description.clone()}</p>
            <div class="flex justify-between text-xs text-gray-400">
                <span>{project.course.clone()}</span>
                <span>{format!("👥 {}", project.occupancy())}</span>
            </div>
            <div class="text-xs text-gray-500 mt-1">{project.creator_name().to_string()}</div>
        </div>
    }
}

/// Previous/next plus numbered page buttons; paging never refetches
#[component]
fn PageControls() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let page_count = move || state.app.with(|app| app.directory().page_count());
    let current = move || state.app.with(|app| app.directory().page());

    let go_to = move |page: usize| {
        state.dispatch(move |d| {
            Box::pin(async move {
                d.go_to_page(page);
            })
        });
    };
    let prev = move |_| {
        state.dispatch(|d| {
            Box::pin(async move {
                d.prev_page();
            })
        });
    };
    let next = move |_| {
        state.dispatch(|d| {
            Box::pin(async move {
                d.next_page();
            })
        });
    };

    view! {
        {move || (page_count() > 1).then(|| view! {
            <div class="flex items-center justify-center space-x-2">
                <button
                    class="px-3 py-2 rounded-lg bg-gray-700 disabled:opacity-40"
                    disabled=move || !state.app.with(|app| app.directory().has_prev())
                    on:click=prev
                >
                    "‹ Prev"
                </button>
                {(1..=page_count()).map(|page| view! {
                    <button
                        on:click=move |_| go_to(page)
                        class=move || if current() == page {
                            "px-3 py-2 rounded-lg bg-primary-600"
                        } else {
                            "px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600"
                        }
                    >
                        {page}
                    </button>
                }).collect_view()}
                <button
                    class="px-3 py-2 rounded-lg bg-gray-700 disabled:opacity-40"
                    disabled=move || !state.app.with(|app| app.directory().has_next())
                    on:click=next
                >
                    "Next ›"
                </button>
            </div>
        })}
    }
}

#[component]
fn CreateProjectForm(open: RwSignal<bool>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let name = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let course = create_rw_signal(String::new());
    let capacity = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ProjectForm {
            name: name.get(),
            description: description.get(),
            course: course.get(),
            capacity: capacity.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.create_project(&form).await.is_ok() {
                    clear(&[name, description, course, capacity]);
                    open.set(false);
                }
            })
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <TextInput label="Name" value=name />
            <TextArea label="Description" value=description />
            <TextInput label="Course" value=course />
            <TextInput label="Capacity" value=capacity kind="number" />
            <SubmitButton label="Create" />
        </form>
    }
}

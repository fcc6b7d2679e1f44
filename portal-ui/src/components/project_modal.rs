//! Project detail modal
//!
//! Overview, messages, tasks and milestones of the open project, plus the
//! join/leave control. Every tab switch refetches that tab.

use leptos::html;
use leptos::*;

use portal::forms::{MilestoneForm, TaskForm};
use portal::membership::Affordance;
use portal::model::time::{format_date, format_datetime};
use portal::model::{Id, Project, TaskStatus};
use portal::ProjectTab;

use super::{clear, SelectInput, SubmitButton, TextArea, TextInput};
use crate::dom;
use crate::state::global::{log_failure, GlobalState};

/// Shown while a project is open
#[component]
pub fn ProjectModal() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let open_id = create_memo(move |_| state.app.with(|app| app.open_project().map(|o| o.id())));

    view! {
        {move || open_id.get().map(|id| view! { <ProjectDetail id=id /> })}
    }
}

fn open_project(state: GlobalState) -> Option<Project> {
    state.app.with(|app| app.open_project().map(|o| o.project.clone()))
}

#[component]
fn ProjectDetail(id: Id) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let tab = create_memo(move |_| {
        state.app.with(|app| app.open_project().map(|o| o.tab).unwrap_or_default())
    });

    let close = move |_| state.dispatch(|d| Box::pin(async move { d.close_project() }));

    view! {
        <div class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center p-4">
            <div class="bg-gray-800 rounded-xl w-full max-w-3xl max-h-[90vh] overflow-y-auto p-6">
                <div class="flex items-start justify-between mb-4">
                    <div>
                        <h2 class="text-2xl font-bold">
                            {move || open_project(state).map(|p| p.name).unwrap_or_default()}
                        </h2>
                        <p class="text-gray-400 text-sm">
                            {move || open_project(state).map(|p| p.course).unwrap_or_default()}
                        </p>
                    </div>
                    <div class="flex items-center space-x-3">
                        <MembershipControl id=id />
                        <button class="text-gray-400 hover:text-white" on:click=close>"✕"</button>
                    </div>
                </div>

                <div class="flex space-x-2 border-b border-gray-700 mb-4">
                    {ProjectTab::ALL.into_iter().map(|t| view! { <TabButton tab=t current=tab /> }).collect_view()}
                </div>

                {move || match tab.get() {
                    ProjectTab::Overview => view! { <OverviewTab /> }.into_view(),
                    ProjectTab::Messages => view! { <MessagesTab /> }.into_view(),
                    ProjectTab::Tasks => view! { <TasksTab /> }.into_view(),
                    ProjectTab::Milestones => view! { <MilestonesTab /> }.into_view(),
                }}
            </div>
        </div>
    }
}

#[component]
fn TabButton(tab: ProjectTab, current: Memo<ProjectTab>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let select = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("select tab", d.select_tab(tab).await);
            })
        });
    };

    view! {
        <button
            on:click=select
            class=move || {
                let base = "px-4 py-2 text-sm font-medium transition-colors";
                if current.get() == tab {
                    format!("{} border-b-2 border-primary-500 text-white", base)
                } else {
                    format!("{} text-gray-400 hover:text-white", base)
                }
            }
        >
            {tab.label()}
        </button>
    }
}

/// Join, leave or the reason neither is possible
#[component]
fn MembershipControl(id: Id) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let affordance = move || {
        state.app.with(|app| {
            app.open_project()
                .and_then(|open| app.affordance_for(&open.project))
        })
    };

    let join = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("join project", d.join_project(id).await);
            })
        });
    };

    let leave = move |_| {
        if !dom::confirm("Are you sure you want to leave this project?") {
            return;
        }
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("leave project", d.leave_project(id, true).await);
            })
        });
    };

    view! {
        {move || match affordance() {
            Some(Affordance::Join) => view! {
                <button
                    on:click=join
                    class="px-4 py-2 rounded-lg bg-green-600 hover:bg-green-700 text-sm font-medium"
                >
                    "Join Project"
                </button>
            }.into_view(),
            Some(Affordance::Leave) => view! {
                <button
                    on:click=leave
                    class="px-4 py-2 rounded-lg bg-red-600 hover:bg-red-700 text-sm font-medium"
                >
                    "Leave Project"
                </button>
            }.into_view(),
            Some(Affordance::Unavailable(block)) => view! {
                <span class="text-sm text-gray-400">{block.to_string()}</span>
            }.into_view(),
            None => view! {}.into_view(),
        }}
    }
}

#[component]
fn OverviewTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        {move || open_project(state).map(|p| {
            let members = p.team_members.clone();
            view! {
                <div class="space-y-4">
                    <p class="text-gray-300 whitespace-pre-line">{p.description.clone()}</p>
                    <div class="grid grid-cols-3 gap-4 text-sm">
                        <div>
                            <div class="text-gray-400">"Faculty"</div>
                            <div>{p.creator_name().to_string()}</div>
                        </div>
                        <div>
                            <div class="text-gray-400">"Team"</div>
                            <div>{p.occupancy()}</div>
                        </div>
                        <div>
                            <div class="text-gray-400">"Status"</div>
                            <div>{p.effective_status().label()}</div>
                        </div>
                    </div>
                    <div>
                        <h3 class="font-semibold mb-2">"Team Members"</h3>
                        {if members.is_empty() {
                            view! { <p class="text-gray-400 text-sm">"No members yet"</p> }.into_view()
                        } else {
                            members.into_iter().map(|m| view! {
                                <div class="flex justify-between bg-gray-700 rounded-lg px-4 py-2 mb-2">
                                    <span>{m.name}</span>
                                    <span class="text-gray-400 text-sm">{m.skills.unwrap_or_default()}</span>
                                </div>
                            }).collect_view()
                        }}
                    </div>
                </div>
            }
        })}
    }
}

#[component]
fn MessagesTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let content = create_rw_signal(String::new());
    let list_ref = create_node_ref::<html::Div>();

    let messages = move || {
        state.app.with(|app| app.open_project().map(|o| o.messages.clone()).unwrap_or_default())
    };

    // Keep the newest message in view
    create_effect(move |_| {
        let count = state.app.with(|app| app.open_project().map(|o| o.messages.len()));
        request_animation_frame(move || {
            if let Some(list) = list_ref.get_untracked() {
                list.set_scroll_top(list.scroll_height());
            }
        });
        count
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = content.get();
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.send_message(&text).await.is_ok() {
                    content.set(String::new());
                }
            })
        });
    };

    view! {
        <div class="space-y-4">
            <div node_ref=list_ref class="h-80 overflow-y-auto space-y-3 bg-gray-900 rounded-lg p-4">
                {move || {
                    let messages = messages();
                    if messages.is_empty() {
                        view! { <p class="text-gray-400 text-sm">"No messages yet"</p> }.into_view()
                    } else {
                        messages.into_iter().map(|m| view! {
                            <div class="bg-gray-800 rounded-lg px-4 py-2">
                                <div class="flex justify-between text-xs text-gray-400 mb-1">
                                    <span class="font-medium text-gray-200">{m.sender.name}</span>
                                    <span>{format_datetime(&m.created_at)}</span>
                                </div>
                                <p class="text-sm whitespace-pre-line">{m.content}</p>
                            </div>
                        }).collect_view()
                    }
                }}
            </div>
            <form on:submit=on_submit class="space-y-3">
                <TextArea label="Message" value=content rows=2 />
                <SubmitButton label="Send" />
            </form>
        </div>
    }
}

#[component]
fn TasksTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let title = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let assignee = create_rw_signal(String::new());
    let due_date = create_rw_signal(String::new());

    let tasks = move || {
        state.app.with(|app| app.open_project().map(|o| o.tasks.clone()).unwrap_or_default())
    };
    let open_count = move || {
        state.app.with(|app| app.open_project().map_or(0, |o| o.open_task_count))
    };
    let assignees = Signal::derive(move || {
        let mut options = vec![(String::new(), "Unassigned".to_string())];
        if let Some(project) = open_project(state) {
            options.extend(project.team_members.into_iter().map(|m| (m.id.to_string(), m.name)));
        }
        options
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = TaskForm {
            title: title.get(),
            description: description.get(),
            assignee_id: assignee.get(),
            due_date: due_date.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.create_task(&form).await.is_ok() {
                    clear(&[title, description, assignee, due_date]);
                }
            })
        });
    };

    view! {
        <div class="space-y-4">
            <p class="text-sm text-gray-400">{move || format!("{} open tasks", open_count())}</p>
            {move || tasks().into_iter().map(|task| {
                let task_id = task.id;
                let current = task.status;
                let set_status = move |ev: web_sys::Event| {
                    let Some(status) = TaskStatus::parse(&event_target_value(&ev)) else {
                        return;
                    };
                    state.dispatch(move |d| {
                        Box::pin(async move {
                            log_failure("update task status", d.update_task_status(task_id, status).await);
                        })
                    });
                };
                view! {
                    <div class="flex items-center justify-between bg-gray-700 rounded-lg px-4 py-3">
                        <div>
                            <div class="font-medium">{task.title}</div>
                            <div class="text-xs text-gray-400">
                                {task.assignee.map(|a| a.name).unwrap_or_else(|| "Unassigned".into())}
                                {task.due_date.map(|d| format!(" · due {}", format_date(&d)))}
                            </div>
                        </div>
                        <select
                            class="bg-gray-800 rounded-lg px-3 py-2 text-sm border border-gray-600"
                            on:change=set_status
                        >
                            {[TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed]
                                .into_iter()
                                .map(|s| view! {
                                    <option value=s.as_str() selected={s == current}>{s.label()}</option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                }
            }).collect_view()}

            <form on:submit=on_submit class="space-y-3 border-t border-gray-700 pt-4">
                <h3 class="font-semibold">"New Task"</h3>
                <TextInput label="Title" value=title />
                <TextArea label="Description" value=description />
                <SelectInput label="Assignee" value=assignee options=assignees />
                <TextInput label="Due date" value=due_date kind="date" />
                <SubmitButton label="Create Task" />
            </form>
        </div>
    }
}

#[component]
fn MilestonesTab() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let title = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let due_date = create_rw_signal(String::new());

    let milestones = move || {
        state.app.with(|app| app.open_project().map(|o| o.milestones.clone()).unwrap_or_default())
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = MilestoneForm {
            title: title.get(),
            description: description.get(),
            due_date: due_date.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.create_milestone(&form).await.is_ok() {
                    clear(&[title, description, due_date]);
                }
            })
        });
    };

    view! {
        <div class="space-y-4">
            {move || milestones().into_iter().map(|m| view! {
                <div class="bg-gray-700 rounded-lg px-4 py-3">
                    <div class="flex justify-between">
                        <span class="font-medium">{m.title}</span>
                        <span class="text-xs text-gray-400">{format_date(&m.due_date)}</span>
                    </div>
                    {m.description.map(|d| view! { <p class="text-sm text-gray-300 mt-1">{d}</p> })}
                    <span class="text-xs uppercase text-gray-400">{m.status}</span>
                </div>
            }).collect_view()}

            <form on:submit=on_submit class="space-y-3 border-t border-gray-700 pt-4">
                <h3 class="font-semibold">"New Milestone"</h3>
                <TextInput label="Title" value=title />
                <TextArea label="Description" value=description />
                <TextInput label="Due date" value=due_date kind="date" />
                <SubmitButton label="Create Milestone" />
            </form>
        </div>
    }
}

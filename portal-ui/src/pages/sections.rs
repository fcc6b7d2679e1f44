//! Sections Page
//!
//! Custom project proposals for everyone; course sections (CRNs) for
//! faculty.

use leptos::*;

use portal::forms::{CrnForm, CustomProjectForm};
use portal::model::{CustomProjectSubmission, ReviewDecision, ReviewStatus};

use crate::components::{clear, SubmitButton, TextArea, TextInput};
use crate::state::global::{log_failure, GlobalState};

#[component]
pub fn Sections() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let is_faculty = create_memo(move |_| state.app.with(|app| app.user().is_some_and(|u| u.is_faculty())));

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Sections"</h1>
                <p class="text-gray-400 mt-1">
                    {move || if is_faculty.get() {
                        "Manage course sections and review project proposals"
                    } else {
                        "Propose your own project"
                    }}
                </p>
            </div>

            {move || if is_faculty.get() {
                view! { <CrnManager /> }.into_view()
            } else {
                view! { <ProposalForm /> }.into_view()
            }}

            <Submissions faculty=is_faculty />
        </div>
    }
}

#[component]
fn Submissions(faculty: Memo<bool>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let submissions = move || state.app.with(|app| app.submissions().to_vec());

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Project Proposals"</h2>
            {move || {
                let items = submissions();
                if items.is_empty() {
                    view! { <p class="text-gray-400">"No proposals"</p> }.into_view()
                } else {
                    items.into_iter().map(|s| view! {
                        <SubmissionRow submission=s faculty=faculty.get() />
                    }).collect_view()
                }
            }}
        </section>
    }
}

#[component]
fn SubmissionRow(submission: CustomProjectSubmission, faculty: bool) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = submission.id;

    let review = move |decision: ReviewDecision| {
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("review submission", d.review_submission(id, decision).await);
            })
        });
    };

    let badge = match submission.status {
        ReviewStatus::Pending => "bg-yellow-600",
        ReviewStatus::Approved => "bg-green-600",
        ReviewStatus::Rejected => "bg-red-600",
    };
    let can_review = faculty && submission.is_pending();

    view! {
        <div class="bg-gray-700 rounded-lg p-4 mb-3">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="font-semibold">{submission.name.clone()}</h3>
                    <div class="text-xs text-gray-400">
                        {format!(
                            "{} · capacity {} · {}",
                            submission.course,
                            submission.capacity,
                            submission.submitter_name.clone().unwrap_or_default()
                        )}
                    </div>
                </div>
                <span class=format!("text-xs px-2 py-1 rounded {}", badge)>{submission.status.as_str()}</span>
            </div>
            <p class="text-sm text-gray-300 mt-2">{submission.description.clone()}</p>
            {submission.notes.clone().map(|n| view! { <p class="text-xs text-gray-400 mt-1">{n}</p> })}
            {can_review.then(|| view! {
                <div class="flex space-x-2 mt-3">
                    <button
                        class="px-3 py-1 rounded bg-green-600 hover:bg-green-700 text-sm"
                        on:click=move |_| review(ReviewDecision::Approved)
                    >
                        "Approve"
                    </button>
                    <button
                        class="px-3 py-1 rounded bg-red-600 hover:bg-red-700 text-sm"
                        on:click=move |_| review(ReviewDecision::Rejected)
                    >
                        "Reject"
                    </button>
                </div>
            })}
        </div>
    }
}

#[component]
fn ProposalForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let name = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let course = create_rw_signal(String::new());
    let capacity = create_rw_signal(String::new());
    let notes = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = CustomProjectForm {
            name: name.get(),
            description: description.get(),
            course: course.get(),
            capacity: capacity.get(),
            notes: notes.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.submit_custom_project(&form).await.is_ok() {
                    clear(&[name, description, course, capacity, notes]);
                }
            })
        });
    };

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Propose a Project"</h2>
            <TextInput label="Name" value=name />
            <TextArea label="Description" value=description />
            <div class="grid grid-cols-2 gap-4">
                <TextInput label="Course" value=course />
                <TextInput label="Capacity" value=capacity kind="number" />
            </div>
            <TextArea label="Notes for the reviewer" value=notes rows=2 />
            <SubmitButton label="Submit for Approval" />
        </form>
    }
}

#[component]
fn CrnManager() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let code = create_rw_signal(String::new());
    let course_name = create_rw_signal(String::new());

    let crns = move || state.app.with(|app| app.crns().to_vec());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = CrnForm {
            code: code.get(),
            course_name: course_name.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                if d.create_crn(&form).await.is_ok() {
                    clear(&[code, course_name]);
                }
            })
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Course Sections"</h2>
            {move || crns().into_iter().map(|crn| {
                let id = crn.id;
                let delete = move |_| {
                    state.dispatch(move |d| {
                        Box::pin(async move {
                            log_failure("delete crn", d.delete_crn(id).await);
                        })
                    });
                };
                view! {
                    <div class="flex items-center justify-between bg-gray-700 rounded-lg px-4 py-2">
                        <div>
                            <span class="font-mono font-medium">{crn.code}</span>
                            <span class="text-sm text-gray-400 ml-3">{crn.course_name}</span>
                        </div>
                        <button class="text-sm text-red-400 hover:text-red-300" on:click=delete>"Delete"</button>
                    </div>
                }
            }).collect_view()}

            <form on:submit=on_submit class="grid grid-cols-3 gap-4 items-end">
                <TextInput label="CRN" value=code />
                <TextInput label="Course name" value=course_name />
                <SubmitButton label="Add Section" />
            </form>
        </section>
    }
}

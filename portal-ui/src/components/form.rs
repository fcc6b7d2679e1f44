//! Form controls bound to string signals

use leptos::*;

use crate::state::global::GlobalState;

pub const INPUT_CLASS: &str = "w-full bg-gray-700 rounded-lg px-4 py-3 text-white \
                               border border-gray-600 focus:border-primary-500 focus:outline-none";

/// Reset every field of a form
pub fn clear(fields: &[RwSignal<String>]) {
    for field in fields {
        field.set(String::new());
    }
}

#[component]
pub fn TextInput(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")]
    kind: &'static str,
    #[prop(optional)]
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <input
                type=kind
                placeholder=placeholder
                class=INPUT_CLASS
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = 3)]
    rows: u32,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <textarea
                rows=rows
                class=INPUT_CLASS
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Dropdown of `(value, label)` pairs
#[component]
pub fn SelectInput(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <select
                class=INPUT_CLASS
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                {move || {
                    options.get()
                        .into_iter()
                        .map(|(v, l)| {
                            let selected = v == value.get_untracked();
                            view! { <option value=v selected=selected>{l}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

/// Submit button, disabled while an action is in flight
#[component]
pub fn SubmitButton(label: &'static str) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <button
            type="submit"
            disabled=move || state.is_busy()
            class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                   disabled:cursor-not-allowed rounded-lg py-3 font-semibold transition-colors"
        >
            {label}
        </button>
    }
}

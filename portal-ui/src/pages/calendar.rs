//! Calendar Page
//!
//! Month grid of assignment due dates. Clicking a marked day lists what is
//! due.

use leptos::*;

use portal::calendar::{DayCell, WEEKDAY_HEADERS};

use crate::components::Loading;
use crate::dom;
use crate::state::global::GlobalState;

#[component]
pub fn Calendar() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let loaded = move || state.app.with(|app| app.calendar().is_loaded());
    let grid = create_memo(move |_| state.app.with(|app| app.calendar().grid()));

    let prev = move |_| {
        state.dispatch(|d| {
            Box::pin(async move {
                d.calendar_prev();
            })
        });
    };
    let next = move |_| {
        state.dispatch(|d| {
            Box::pin(async move {
                d.calendar_next();
            })
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Calendar"</h1>
                <div class="flex items-center space-x-4">
                    <button class="px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600" on:click=prev>"‹"</button>
                    <span class="text-lg font-medium w-40 text-center">
                        {move || grid.with(|g| g.month.label())}
                    </span>
                    <button class="px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600" on:click=next>"›"</button>
                </div>
            </div>

            {move || if loaded() {
                view! {
                    <div class="grid grid-cols-7 gap-1">
                        {WEEKDAY_HEADERS.into_iter().map(|day| view! {
                            <div class="text-center text-sm text-gray-400 py-2">{day}</div>
                        }).collect_view()}
                        {grid.get().cells.into_iter().map(|cell| view! { <DaySquare cell=cell /> }).collect_view()}
                    </div>
                }.into_view()
            } else {
                view! { <Loading /> }.into_view()
            }}
        </div>
    }
}

#[component]
fn DaySquare(cell: DayCell) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let date = cell.date;

    let show_day = move |_| {
        state.dispatch(move |d| {
            Box::pin(async move {
                if let Some(summary) = d.calendar_day(date) {
                    dom::alert(&summary);
                }
            })
        });
    };

    let mut class = String::from("h-20 rounded-lg p-2 text-sm cursor-pointer transition-colors ");
    class.push_str(if cell.in_month { "bg-gray-800 hover:bg-gray-700" } else { "bg-gray-900 text-gray-600" });
    if cell.is_today {
        class.push_str(" ring-2 ring-primary-500");
    }

    view! {
        <div class=class on:click=show_day>
            <div>{cell.date.format("%-d").to_string()}</div>
            {cell.is_marked().then(|| view! {
                <div class="mt-1 text-xs bg-primary-600 rounded px-1 inline-block">
                    {format!("{} due", cell.assignment_count)}
                </div>
            })}
        </div>
    }
}

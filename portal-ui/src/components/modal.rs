//! Modal dialog

use leptos::*;

/// Overlay shown while `open` is true; clicking the backdrop closes it
#[component]
pub fn Modal(title: &'static str, open: RwSignal<bool>, children: ChildrenFn) -> impl IntoView {
    let children = store_value(children);

    view! {
        {move || {
            open.get().then(|| view! {
                <div
                    class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center p-4"
                    on:click=move |_| open.set(false)
                >
                    <div
                        class="bg-gray-800 rounded-xl w-full max-w-lg max-h-[90vh] overflow-y-auto p-6"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <div class="flex items-center justify-between mb-4">
                            <h2 class="text-xl font-semibold">{title}</h2>
                            <button
                                class="text-gray-400 hover:text-white"
                                on:click=move |_| open.set(false)
                            >
                                "✕"
                            </button>
                        </div>
                        {children.with_value(|children| children())}
                    </div>
                </div>
            })
        }}
    }
}

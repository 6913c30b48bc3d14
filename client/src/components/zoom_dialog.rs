//! Full-size image viewer.

use leptos::prelude::*;

#[component]
pub fn ZoomDialog(url: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || url.get().is_some()>
            <div class="dialog-backdrop" on:click=move |_| url.set(None)>
                <div class="dialog" on:click=|ev| ev.stop_propagation()>
                    <button class="dialog__close" title="Close" on:click=move |_| url.set(None)>
                        "✕"
                    </button>
                    <img class="dialog__image" src=move || url.get().unwrap_or_default() alt="Zoomed"/>
                </div>
            </div>
        </Show>
    }
}

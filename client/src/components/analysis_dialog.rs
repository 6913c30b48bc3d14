//! Dialog showing the most recent analysis result.

use gallery::workspace::AnalysisDetail;
use leptos::prelude::*;

#[component]
pub fn AnalysisDialog(#[prop(into)] detail: Signal<Option<AnalysisDetail>>, on_close: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || detail.get().is_some()>
            <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
                <div class="dialog" on:click=|ev| ev.stop_propagation()>
                    <button class="dialog__close" title="Close" on:click=move |_| on_close.run(())>
                        "✕"
                    </button>
                    <img
                        class="dialog__image"
                        src=move || detail.get().map(|d| d.url).unwrap_or_default()
                        alt="Analyzed"
                    />
                    <p class="dialog__analysis">
                        {move || detail.get().map(|d| d.analysis).unwrap_or_default()}
                    </p>
                </div>
            </div>
        </Show>
    }
}

//! Thumbnail card for one uploaded image.

#[cfg(test)]
#[path = "image_card_test.rs"]
mod image_card_test;

use leptos::prelude::*;

/// Button text for the analyze action.
pub fn analyze_label(analyzing: bool) -> &'static str {
    if analyzing { "Analyzing..." } else { "Analyze" }
}

/// One image with its analyze and zoom actions.
#[component]
pub fn ImageCard(
    index: usize,
    url: String,
    analysis: Option<String>,
    #[prop(into)] analyzing: Signal<bool>,
    on_analyze: Callback<usize>,
    on_zoom: Callback<String>,
) -> impl IntoView {
    let zoom_url = url.clone();
    let has_analysis = analysis.is_some();

    view! {
        <div class="image-card">
            <img class="image-card__thumb" src=url alt=format!("Uploaded {index}")/>
            <Show when=move || has_analysis>
                <p class="image-card__analysis">{analysis.clone().unwrap_or_default()}</p>
            </Show>
            <div class="image-card__actions">
                <button
                    class="btn image-card__analyze"
                    disabled=move || analyzing.get()
                    on:click=move |_| on_analyze.run(index)
                >
                    {move || analyze_label(analyzing.get())}
                </button>
                <button
                    class="btn image-card__zoom"
                    title="Zoom"
                    on:click=move |_| on_zoom.run(zoom_url.clone())
                >
                    "Zoom"
                </button>
            </div>
        </div>
    }
}

//! Dashboard page: the authenticated image workspace.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only protected route. On mount it repeats the token check,
//! loads the collection, and from then on drives upload, analyze, and logout
//! through the shared workflows in `gallery::actions`.
//!
//! DESIGN
//! ======
//! Every request runs in its own task and writes back through `AppState`.
//! Leaving the page resets the workspace, which turns any response still in
//! flight into a dropped stale result.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use gallery::workspace::{Outcome, WorkspaceError};
use gallery::{ImageRecord, Route, StateHandle, StoreError};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::analysis_dialog::AnalysisDialog;
use crate::components::image_card::ImageCard;
use crate::components::zoom_dialog::ZoomDialog;
use crate::net::api::HttpApi;
use crate::pages::login::LOGOUT_FAILED_FLAG;
use crate::state::AppState;

/// What the page should surface after a workflow settles.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
#[derive(Clone, Debug, PartialEq, Eq)]
enum Report {
    Nothing,
    Prompt(String),
    Reauth,
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn classify(result: Result<Outcome, WorkspaceError>) -> Report {
    match result {
        Ok(Outcome::ReauthRequired) | Err(WorkspaceError::NotAuthenticated) => Report::Reauth,
        Ok(_) => Report::Nothing,
        Err(e) => Report::Prompt(e.to_string()),
    }
}

/// Where to go after logout. A token left in storage is reported on the
/// login page, since the guard moves us off the dashboard either way.
fn after_logout(result: &Result<Route, StoreError>) -> String {
    match result {
        Ok(route) => route.path().to_owned(),
        Err(_) => format!("{}?{LOGOUT_FAILED_FLAG}=1", Route::Login.path()),
    }
}

/// Grid identity. A card is rebuilt only when its position or record
/// changes, so a new analysis re-renders just that card.
fn card_key(row: &(usize, ImageRecord)) -> (usize, ImageRecord) {
    row.clone()
}

fn upload_label(uploading: bool) -> &'static str {
    if uploading { "Uploading..." } else { "Upload" }
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn apply_report(report: Report, prompt: RwSignal<Option<String>>, reauth: RwSignal<bool>) {
    match report {
        Report::Nothing => {}
        Report::Prompt(message) => prompt.set(Some(message)),
        Report::Reauth => reauth.set(true),
    }
}

/// Dashboard page: upload form, image grid, and result dialogs.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let api = expect_context::<HttpApi>();
    let navigate = use_navigate();

    let prompt = RwSignal::new(None::<String>);
    let reauth = RwSignal::new(false);
    let zoomed = RwSignal::new(None::<String>);
    let file_input = NodeRef::<leptos::html::Input>::new();

    // Entry check, then the first list.
    let entered = StoredValue::new(false);
    {
        let api = api.clone();
        let navigate = navigate.clone();
        Effect::new(move || {
            if entered.get_value() || !state.with(|s| s.session.is_restored()) {
                return;
            }
            entered.set_value(true);

            #[cfg(feature = "hydrate")]
            {
                let api = api.clone();
                let navigate = navigate.clone();
                leptos::task::spawn_local(async move {
                    match gallery::actions::enter(&state, &api).await {
                        Ok(outcome) => apply_report(classify(Ok(outcome)), prompt, reauth),
                        Err(route) => navigate(route.path(), NavigateOptions::default()),
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&api, &navigate);
            }
        });
    }
    on_cleanup(move || {
        let _ = state.update(|s| s.workspace.leave());
    });

    // A finished upload clears the selection; mirror that in the picker.
    Effect::new(move || {
        if state.with(|s| s.workspace.selected_file().is_none())
            && let Some(input) = file_input.get()
        {
            input.set_value("");
        }
    });

    let on_file_change = move |ev: leptos::ev::Event| {
        prompt.set(None);
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            leptos::task::spawn_local(async move {
                match crate::util::file::read_selected(&input).await {
                    Ok(file) => {
                        let _ = state.update(|s| {
                            s.workspace.clear_error();
                            s.workspace.select_file(file);
                        });
                    }
                    Err(message) => prompt.set(Some(message)),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = ev;
        }
    };

    let upload_api = api.clone();
    let on_upload = move |_| {
        prompt.set(None);
        #[cfg(feature = "hydrate")]
        {
            let api = upload_api.clone();
            leptos::task::spawn_local(async move {
                let result = gallery::actions::upload(&state, &api).await;
                apply_report(classify(result), prompt, reauth);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &upload_api;
        }
    };

    let on_analyze = Callback::new(move |index: usize| {
        prompt.set(None);
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                let result = gallery::actions::analyze(&state, &api, index).await;
                apply_report(classify(result), prompt, reauth);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, index);
        }
    });
    let on_zoom = Callback::new(move |url: String| zoomed.set(Some(url)));
    let on_close_detail = Callback::new(move |()| {
        let _ = state.update(|s| s.workspace.close_detail());
    });

    let on_logout = move |_| {
        let result = gallery::actions::logout(&state);
        prompt.set(None);
        reauth.set(false);
        navigate(&after_logout(&result), NavigateOptions::default());
    };

    let uploading = move || state.with(|s| s.workspace.is_uploading());
    let loading = move || state.with(|s| s.workspace.is_loading());
    let error = move || state.with(|s| s.workspace.error().map(str::to_owned));
    let detail = Signal::derive(move || state.with(|s| s.workspace.detail().cloned()));

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1>"Image Lens"</h1>
                <button class="btn dashboard__logout" on:click=on_logout.clone()>
                    "Logout"
                </button>
            </header>

            <div class="dashboard__banner dashboard__banner--reauth" class:hidden=move || !reauth.get()>
                <span>"Your session has expired. Please log in again."</span>
                <button class="btn" on:click=on_logout>
                    "Log in again"
                </button>
            </div>
            <Show when=move || error().is_some() && !reauth.get()>
                <div class="dashboard__banner">{move || error().unwrap_or_default()}</div>
            </Show>
            <Show when=move || prompt.get().is_some()>
                <div class="dashboard__banner dashboard__banner--prompt">
                    {move || prompt.get().unwrap_or_default()}
                </div>
            </Show>

            <section class="dashboard__upload">
                <input
                    class="dashboard__file"
                    type="file"
                    accept="image/*"
                    node_ref=file_input
                    on:change=on_file_change
                />
                <button class="btn btn--primary" disabled=uploading on:click=on_upload>
                    {move || upload_label(uploading())}
                </button>
            </section>

            <Show when=loading>
                <p class="dashboard__loading">"Loading images..."</p>
            </Show>

            <div class="dashboard__grid">
                <For
                    each=move || {
                        state.with(|s| s.workspace.records().iter().cloned().enumerate().collect::<Vec<_>>())
                    }
                    key=card_key
                    children=move |(index, record)| {
                        let analyzing = Signal::derive(move || state.with(|s| s.workspace.is_analyzing(index)));
                        view! {
                            <ImageCard
                                index
                                url=record.url
                                analysis=record.analysis
                                analyzing
                                on_analyze
                                on_zoom
                            />
                        }
                    }
                />
            </div>

            <AnalysisDialog detail on_close=on_close_detail/>
            <ZoomDialog url=zoomed/>
        </div>
    }
}

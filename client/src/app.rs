//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use gallery::Route as View;

use crate::net::api::HttpApi;
use crate::pages::{dashboard::DashboardPage, login::LoginPage, register::RegisterPage};
use crate::state::AppState;
use crate::util::auth::ProtectedRoute;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the single client state and the backend API to every page.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let state = AppState::new();
    provide_context(state);
    provide_context(HttpApi::from_build_env());

    // Effects only run in the browser, where the stored token is reachable.
    Effect::new(move || state.restore());

    view! {
        <Stylesheet id="leptos" href="/pkg/imagelens.css"/>
        <Title text="Image Lens"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| {
                        view! {
                            <ProtectedRoute route=View::Dashboard>
                                <DashboardPage/>
                            </ProtectedRoute>
                        }
                    }
                />
            </Routes>
        </Router>
    }
}

//! Route guarding for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes and the dashboard's own entry check must redirect the same
//! way, so both go through [`redirect_target`].

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use gallery::{Access, Route, authorize};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::AppState;

/// Where a guarded navigation has to go instead, if anywhere.
pub fn redirect_target(access: Access) -> Option<&'static str> {
    match access {
        Access::Redirect(route) => Some(route.path()),
        Access::Render(_) | Access::Pending => None,
    }
}

/// Navigate away whenever `access` turns into a redirect.
pub fn install_unauth_redirect<F>(access: Memo<Access>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(target) = redirect_target(access.get()) {
            navigate(target, NavigateOptions::default());
        }
    });
}

/// Render `children` only while the session holds a token.
///
/// The decision is recomputed from the session on every change, so a logout
/// anywhere in the tree takes effect on the next render.
#[component]
pub fn ProtectedRoute(route: Route, children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();
    let access = Memo::new(move |_| state.with(|s| authorize(route, &s.session)));
    install_unauth_redirect(access, use_navigate());

    move || match access.get() {
        Access::Render(_) => children().into_any(),
        Access::Pending => view! { <p class="guard-message">"Loading..."</p> }.into_any(),
        Access::Redirect(_) => view! { <p class="guard-message">"Redirecting to login..."</p> }.into_any(),
    }
}

//! Login page: email + password against `/api/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use gallery::StateHandle;
use gallery::auth::LoginForm;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::api::HttpApi;
use crate::pages::password_input_type;
use crate::state::AppState;

/// Query flag set by the registration page on success.
pub(crate) const REGISTERED_FLAG: &str = "registered";

/// Query flag set by the dashboard when logout left the stored token behind.
pub(crate) const LOGOUT_FAILED_FLAG: &str = "logout_failed";

fn registered_notice(flag: Option<&str>) -> Option<&'static str> {
    flag.map(|_| "Registration successful! Please log in.")
}

fn logout_failed_notice(flag: Option<&str>) -> Option<&'static str> {
    flag.map(|_| {
        "You are logged out here, but the saved session could not be removed from this browser. \
         Clear this site's data to keep it from signing you back in."
    })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let api = expect_context::<HttpApi>();
    let navigate = use_navigate();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // A login still waiting on the backend must not sign in once we are gone.
    on_cleanup(move || {
        let _ = state.update(|s| s.login_gate.leave());
    });

    let notice = move || registered_notice(query.read().get(REGISTERED_FLAG).as_deref());
    let warning = move || logout_failed_notice(query.read().get(LOGOUT_FAILED_FLAG).as_deref());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = LoginForm {
            email: email.get(),
            password: password.get(),
        };
        if let Err(e) = form.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match gallery::auth::login(&api, &state, &form).await {
                    Ok(route) => {
                        info.set(String::new());
                        navigate(route.path(), leptos_router::NavigateOptions::default());
                    }
                    Err(gallery::auth::AuthError::Abandoned | gallery::auth::AuthError::Detached) => return,
                    Err(e) => info.set(format!("Login failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &navigate, state, form);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Login"</h1>
                <Show when=move || notice().is_some()>
                    <p class="auth-message auth-message--ok">{move || notice().unwrap_or_default()}</p>
                </Show>
                <Show when=move || warning().is_some()>
                    <p class="auth-message">{move || warning().unwrap_or_default()}</p>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="Email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <div class="auth-password">
                        <input
                            class="auth-input"
                            type=move || password_input_type(show_password.get())
                            placeholder="Password"
                            required
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <button
                            class="auth-password__toggle"
                            type="button"
                            on:click=move |_| show_password.update(|v| *v = !*v)
                        >
                            {move || if show_password.get() { "Hide" } else { "Show" }}
                        </button>
                    </div>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Login"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-switch">
                    "Don't have an account? "
                    <A href="/register">"Register"</A>
                </p>
            </div>
        </div>
    }
}

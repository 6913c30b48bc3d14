//! Registration page. A successful registration does not log in; it sends
//! the user to the login page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gallery::auth::RegisterForm;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::net::api::HttpApi;
#[cfg(any(test, feature = "hydrate"))]
use crate::pages::login::REGISTERED_FLAG;
use crate::pages::password_input_type;

/// Login path carrying the "just registered" notice.
#[cfg(any(test, feature = "hydrate"))]
fn after_registration(login_path: &str) -> String {
    format!("{login_path}?{REGISTERED_FLAG}=1")
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let show_confirm = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let alive = Arc::new(AtomicBool::new(true));
    {
        let alive = Arc::clone(&alive);
        on_cleanup(move || alive.store(false, Ordering::Relaxed));
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = RegisterForm {
            email: email.get(),
            password: password.get(),
            confirm: confirm.get(),
        };
        // Mismatched passwords never reach the backend.
        if let Err(e) = form.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            let alive = Arc::clone(&alive);
            leptos::task::spawn_local(async move {
                let result = gallery::auth::register(&api, &form).await;
                if !alive.load(Ordering::Relaxed) {
                    return;
                }
                match result {
                    Ok(route) => {
                        navigate(
                            &after_registration(route.path()),
                            leptos_router::NavigateOptions::default(),
                        );
                    }
                    Err(e) => info.set(format!("Registration failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &navigate, &alive, form);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Register"</h1>
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
                    <div class="auth-password">
                        <input
                            class="auth-input"
                            type=move || password_input_type(show_confirm.get())
                            placeholder="Confirm Password"
                            required
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <button
                            class="auth-password__toggle"
                            type="button"
                            on:click=move |_| show_confirm.update(|v| *v = !*v)
                        >
                            {move || if show_confirm.get() { "Hide" } else { "Show" }}
                        </button>
                    </div>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-switch">
                    "Already have an account? "
                    <A href="/">"Login"</A>
                </p>
            </div>
        </div>
    }
}

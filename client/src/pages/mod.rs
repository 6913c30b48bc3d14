//! One module per route: login, register, and the image dashboard.
//!
//! Pages start requests and turn their results into prompts or navigation.
//! The workflow rules themselves live in `gallery`.

pub mod dashboard;
pub mod login;
pub mod register;

/// `type` attribute for a password field with a visibility toggle.
pub(crate) fn password_input_type(visible: bool) -> &'static str {
    if visible { "text" } else { "password" }
}

//! # client
//!
//! Leptos + WASM frontend for imagelens: login, registration and the image
//! dashboard. Session, routing and workspace rules live in the `gallery`
//! crate; this crate renders them and talks to the backend over `gloo-net`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}

//! Client state shared through Leptos context.
//!
//! DESIGN
//! ======
//! One [`AppState`] signal holds the session and the workspace together, so
//! the route guard and the dashboard always read the same token. Async tasks
//! reach it through [`StateHandle`], never by holding a borrow across an
//! await.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub mod storage;

use gallery::{ClientState, Session, StateHandle};
use leptos::prelude::*;

use self::storage::BrowserStore;

/// Shared client state provided at the application root.
#[derive(Clone, Copy)]
pub struct AppState(RwSignal<ClientState<BrowserStore>>);

impl AppState {
    /// Fresh state whose session has not read `localStorage` yet.
    pub fn new() -> Self {
        Self(RwSignal::new(ClientState::new(Session::new(BrowserStore))))
    }

    /// Load the persisted token. Repeated calls are no-ops.
    pub fn restore(self) {
        self.0.update(|s| s.session.restore());
    }

    /// Read the state, tracking it reactively.
    pub fn with<R>(self, f: impl FnOnce(&ClientState<BrowserStore>) -> R) -> R {
        self.0.with(f)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandle<BrowserStore> for AppState {
    fn update<R>(&self, f: impl FnOnce(&mut ClientState<BrowserStore>) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}

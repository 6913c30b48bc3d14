//! The single owned client state and the handle async code reaches it by.
//!
//! DESIGN
//! ======
//! Session and workspace live in one [`ClientState`] that is injected into
//! every view that needs it. Async workflow code never holds a borrow across
//! an await: it goes through [`StateHandle::update`] for each synchronous
//! step, so the Leptos frontend can back the handle with a signal and the CLI
//! with a `RefCell`.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::auth::LoginGate;
use crate::guard::Route;
use crate::session::{Session, StoreError, TokenStore};
use crate::workspace::Workspace;

/// Everything the client knows about the current user.
#[derive(Clone, Debug)]
pub struct ClientState<S> {
    pub session: Session<S>,
    pub workspace: Workspace,
    pub login_gate: LoginGate,
}

impl<S: TokenStore> ClientState<S> {
    pub fn new(session: Session<S>) -> Self {
        Self {
            session,
            workspace: Workspace::default(),
            login_gate: LoginGate::default(),
        }
    }

    /// Log out: clear the session, drop all workspace state and invalidate
    /// every outstanding request and login. The in-memory side always
    /// happens.
    ///
    /// Returns the view to navigate to.
    ///
    /// # Errors
    ///
    /// Returns the store error when the persisted token survived, so the
    /// caller can tell the user the next start will log them back in.
    pub fn logout(&mut self) -> Result<Route, StoreError> {
        let cleared = self.session.logout();
        self.workspace.reset();
        self.login_gate.leave();
        match cleared {
            Ok(()) => {
                log::debug!("logged out");
                Ok(Route::Login)
            }
            Err(e) => {
                log::warn!("logout could not clear stored token: {e}");
                Err(e)
            }
        }
    }
}

/// Short synchronous access to shared [`ClientState`].
pub trait StateHandle<S> {
    /// Run `f` against the state. Returns `None` once the state is gone
    /// (e.g. the owning view was disposed).
    fn update<R>(&self, f: impl FnOnce(&mut ClientState<S>) -> R) -> Option<R>;
}

impl<S> StateHandle<S> for Rc<RefCell<ClientState<S>>> {
    fn update<R>(&self, f: impl FnOnce(&mut ClientState<S>) -> R) -> Option<R> {
        let mut state = self.try_borrow_mut().ok()?;
        Some(f(&mut state))
    }
}

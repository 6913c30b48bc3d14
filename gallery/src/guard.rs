//! Route table and the protected-route gate.
//!
//! The gate is a presence check: a stored token grants access whether or not
//! the backend would still accept it. An expired token is only discovered
//! when an authenticated request comes back 401.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::session::{Session, TokenStore};

/// User-facing views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Whether rendering this view requires a token.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

/// Outcome of one guarded navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Render(Route),
    Redirect(Route),
    /// The session has not read its persisted token yet.
    Pending,
}

/// Decide whether `route` may render given `session` as it is right now.
///
/// Must be called on every navigation; the result is never cached.
pub fn authorize<S: TokenStore>(route: Route, session: &Session<S>) -> Access {
    if !route.is_protected() {
        return Access::Render(route);
    }
    if !session.is_restored() {
        return Access::Pending;
    }
    access_for(route, session.is_authenticated())
}

/// Presence-only decision for a protected route.
#[must_use]
pub fn access_for(route: Route, has_token: bool) -> Access {
    if !route.is_protected() || has_token {
        Access::Render(route)
    } else {
        Access::Redirect(Route::Login)
    }
}

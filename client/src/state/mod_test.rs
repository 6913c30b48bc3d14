use super::*;
use gallery::{Access, Route, StoreError, authorize};

fn with_owner(f: impl FnOnce()) {
    Owner::new().with(f);
}

#[test]
fn new_state_is_unrestored_so_guard_waits() {
    with_owner(|| {
        let state = AppState::new();
        let access = state.with(|s| authorize(Route::Dashboard, &s.session));
        assert_eq!(access, Access::Pending);
    });
}

#[test]
fn handle_update_reaches_workspace() {
    with_owner(|| {
        let state = AppState::new();
        let loading = state.update(|s| s.workspace.is_loading());
        assert_eq!(loading, Some(false));
    });
}

#[test]
fn logout_through_handle_leaves_guard_redirecting() {
    with_owner(|| {
        let state = AppState::new();
        // Outside the browser there is no storage to clear; memory still is.
        let route = gallery::actions::logout(&state);
        assert_eq!(route, Err(StoreError::Unavailable));
        let access = state.with(|s| authorize(Route::Dashboard, &s.session));
        assert_eq!(access, Access::Redirect(Route::Login));
    });
}

#[test]
fn leaving_login_through_handle_expires_ticket() {
    with_owner(|| {
        let state = AppState::new();
        let ticket = state.update(|s| s.login_gate.issue()).unwrap();
        let _ = state.update(|s| s.login_gate.leave());
        assert!(!state.with(|s| s.login_gate.is_current(&ticket)));
    });
}

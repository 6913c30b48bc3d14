use super::*;
use crate::session::{MemoryStore, Token};

#[test]
fn route_paths_match_backend_contract() {
    assert_eq!(Route::Login.path(), "/");
    assert_eq!(Route::Register.path(), "/register");
    assert_eq!(Route::Dashboard.path(), "/dashboard");
}

#[test]
fn only_dashboard_is_protected() {
    assert!(Route::Dashboard.is_protected());
    assert!(!Route::Login.is_protected());
    assert!(!Route::Register.is_protected());
}

#[test]
fn public_routes_render_without_token() {
    let session = Session::restored(MemoryStore::default());
    assert_eq!(authorize(Route::Login, &session), Access::Render(Route::Login));
    assert_eq!(authorize(Route::Register, &session), Access::Render(Route::Register));
}

#[test]
fn dashboard_redirects_to_login_without_token() {
    let session = Session::restored(MemoryStore::default());
    assert_eq!(authorize(Route::Dashboard, &session), Access::Redirect(Route::Login));
}

#[test]
fn dashboard_renders_with_any_present_token() {
    // Validity is not checked here; an expired token still passes.
    let session = Session::restored(MemoryStore::with_token("expired-jwt"));
    assert_eq!(authorize(Route::Dashboard, &session), Access::Render(Route::Dashboard));
}

#[test]
fn unrestored_session_is_pending() {
    let session = Session::new(MemoryStore::with_token("T1"));
    assert_eq!(authorize(Route::Dashboard, &session), Access::Pending);
}

#[test]
fn logout_affects_next_check_immediately() {
    let mut session = Session::restored(MemoryStore::default());
    session.login(Token::parse("T1").unwrap()).unwrap();
    assert_eq!(authorize(Route::Dashboard, &session), Access::Render(Route::Dashboard));
    session.logout().unwrap();
    assert_eq!(authorize(Route::Dashboard, &session), Access::Redirect(Route::Login));
}

#[test]
fn access_is_granted_iff_token_present() {
    for route in [Route::Login, Route::Register, Route::Dashboard] {
        for has_token in [false, true] {
            let granted = matches!(access_for(route, has_token), Access::Render(_));
            assert_eq!(granted, has_token || !route.is_protected(), "{route:?} {has_token}");
        }
    }
}

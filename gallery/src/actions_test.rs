use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::api::ApiError;
use crate::auth::{LoginForm, login};
use crate::session::{MemoryStore, Session, Token};
use crate::state::ClientState;
use crate::testing::{Call, FakeApi, StickyStore, record};
use crate::types::{ImageRecord, UploadFile};

type Shared = Rc<RefCell<ClientState<MemoryStore>>>;

fn shared(store: &MemoryStore) -> Shared {
    Rc::new(RefCell::new(ClientState::new(Session::restored(store.clone()))))
}

fn logged_in() -> Shared {
    shared(&MemoryStore::with_token("T1"))
}

fn png(name: &str) -> UploadFile {
    UploadFile {
        name: name.to_owned(),
        content_type: Some("image/png".to_owned()),
        bytes: vec![1, 2, 3],
    }
}

fn records(state: &Shared) -> Vec<ImageRecord> {
    state.borrow().workspace.records().to_vec()
}

// =============================================================
// Entry / list
// =============================================================

#[tokio::test]
async fn enter_without_token_redirects_and_issues_nothing() {
    let state = shared(&MemoryStore::default());
    let api = FakeApi::default();
    assert_eq!(enter(&state, &api).await, Err(Route::Login));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn enter_lists_with_bearer_token() {
    let state = logged_in();
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));

    assert_eq!(enter(&state, &api).await, Ok(Outcome::Applied));
    assert_eq!(records(&state), vec![record("u1", "p1")]);
    assert_eq!(api.calls(), vec![Call::List { token: "T1".to_owned() }]);
}

#[tokio::test]
async fn refresh_failure_keeps_collection() {
    let state = logged_in();
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    api.push_list(Err(ApiError::Transport("offline".to_owned())));

    enter(&state, &api).await.unwrap();
    assert_eq!(refresh(&state, &api).await, Ok(Outcome::Failed));
    assert_eq!(records(&state), vec![record("u1", "p1")]);
}

// =============================================================
// Upload
// =============================================================

#[tokio::test]
async fn upload_without_file_issues_no_request() {
    let state = logged_in();
    let api = FakeApi::default();
    assert_eq!(upload(&state, &api).await, Err(WorkspaceError::NoFileSelected));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn upload_then_collection_equals_following_list() {
    let state = logged_in();
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    enter(&state, &api).await.unwrap();

    let canonical = vec![record("u1-fresh", "p1"), record("u2", "user_1/cat.png")];
    api.push_list(Ok(canonical.clone()));
    state.borrow_mut().workspace.select_file(Some(png("cat.png")));

    assert_eq!(upload(&state, &api).await, Ok(Outcome::Applied));
    assert_eq!(records(&state), canonical);
    assert!(state.borrow().workspace.selected_file().is_none());
    assert_eq!(
        api.calls(),
        vec![
            Call::List { token: "T1".to_owned() },
            Call::Upload {
                token: "T1".to_owned(),
                file: "cat.png".to_owned(),
            },
            Call::List { token: "T1".to_owned() },
        ]
    );
}

#[tokio::test]
async fn failed_upload_does_not_relist() {
    let state = logged_in();
    let api = FakeApi::default();
    api.upload_returns(Err(ApiError::Status { status: 500, message: None }));
    state.borrow_mut().workspace.select_file(Some(png("cat.png")));

    assert_eq!(upload(&state, &api).await, Ok(Outcome::Failed));
    assert!(state.borrow().workspace.selected_file().is_none());
    assert!(!api.calls().iter().any(|c| matches!(c, Call::List { .. })));
}

// =============================================================
// Analyze
// =============================================================

#[tokio::test]
async fn analyze_without_token_issues_no_request() {
    let state = logged_in();
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    enter(&state, &api).await.unwrap();
    state.borrow_mut().session.logout().unwrap();

    assert_eq!(analyze(&state, &api, 0).await, Err(WorkspaceError::NotAuthenticated));
    assert!(!api.calls().iter().any(|c| matches!(c, Call::Analyze { .. })));
}

#[tokio::test]
async fn full_lifecycle_login_list_analyze() {
    let store = MemoryStore::default();
    let state = shared(&store);
    let api = FakeApi::default();
    api.login_returns(Ok("T1"));
    api.push_list(Ok(vec![record("u1", "p1")]));
    api.push_analysis(Ok("a cat"));

    let form = LoginForm {
        email: "a@b.com".to_owned(),
        password: "pw".to_owned(),
    };
    assert_eq!(login(&api, &state, &form).await, Ok(Route::Dashboard));
    assert_eq!(enter(&state, &api).await, Ok(Outcome::Applied));
    assert_eq!(analyze(&state, &api, 0).await, Ok(Outcome::Applied));

    assert_eq!(
        records(&state),
        vec![ImageRecord {
            url: "u1".to_owned(),
            storage_path: "p1".to_owned(),
            analysis: Some("a cat".to_owned()),
        }]
    );
    assert!(api.calls().contains(&Call::Analyze {
        token: "T1".to_owned(),
        url: "u1".to_owned(),
    }));
}

#[tokio::test]
async fn analyze_resolving_after_logout_is_dropped() {
    let store = MemoryStore::with_token("T1");
    let state = shared(&store);
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    enter(&state, &api).await.unwrap();

    api.push_analysis(Ok("a cat"));
    let release = api.gate_analyze();

    let (outcome, route) = tokio::join!(analyze(&state, &api, 0), async {
        // The analyze request is outstanding by the time this runs.
        assert!(state.borrow().workspace.is_analyzing(0));
        let route = logout(&state).unwrap();
        let _ = release.send(());
        route
    });

    assert_eq!(route, Route::Login);
    assert_eq!(outcome, Ok(Outcome::Stale));
    let state = state.borrow();
    assert!(state.workspace.records().is_empty());
    assert!(state.workspace.detail().is_none());
    assert!(state.session.current_token().is_none());
    assert!(store.peek().is_none());
}

#[tokio::test]
async fn unauthorized_list_requires_reauth_but_keeps_session() {
    let state = logged_in();
    let api = FakeApi::default();
    api.push_list(Err(ApiError::Status { status: 401, message: None }));

    assert_eq!(enter(&state, &api).await, Ok(Outcome::ReauthRequired));
    assert_eq!(
        state.borrow().session.current_token().map(Token::as_str),
        Some("T1")
    );
}

#[tokio::test]
async fn logout_clears_session_and_workspace() {
    let store = MemoryStore::with_token("T1");
    let state = shared(&store);
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    enter(&state, &api).await.unwrap();

    assert_eq!(logout(&state), Ok(Route::Login));
    assert!(records(&state).is_empty());
    assert!(store.peek().is_none());
}

#[tokio::test]
async fn logout_with_stuck_store_is_reported() {
    let store = StickyStore(MemoryStore::with_token("T1"));
    let state = Rc::new(RefCell::new(ClientState::new(Session::restored(store))));
    let api = FakeApi::default();
    api.push_list(Ok(vec![record("u1", "p1")]));
    enter(&state, &api).await.unwrap();

    assert!(logout(&state).is_err());
    assert!(!state.borrow().session.is_authenticated());
    assert!(state.borrow().workspace.records().is_empty());
}

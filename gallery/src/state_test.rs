use super::*;
use crate::session::{MemoryStore, Token};
use crate::testing::StickyStore;
use crate::types::UploadFile;

#[test]
fn logout_resets_workspace_and_session() {
    let store = MemoryStore::default();
    let mut state = ClientState::new(Session::restored(store.clone()));
    state.session.login(Token::parse("T1").unwrap()).unwrap();
    state.workspace.select_file(Some(UploadFile {
        name: "a.png".to_owned(),
        content_type: None,
        bytes: vec![1],
    }));

    assert_eq!(state.logout(), Ok(Route::Login));
    assert!(!state.session.is_authenticated());
    assert!(state.workspace.selected_file().is_none());
    assert!(store.peek().is_none());
}

#[test]
fn shared_handle_runs_update() {
    let handle = Rc::new(RefCell::new(ClientState::new(Session::restored(MemoryStore::with_token("T1")))));
    let authed = handle.update(|s| s.session.is_authenticated());
    assert_eq!(authed, Some(true));
}

#[test]
fn shared_handle_reports_busy_state_as_gone() {
    let handle = Rc::new(RefCell::new(ClientState::new(Session::restored(MemoryStore::default()))));
    let _guard = handle.borrow();
    assert_eq!(handle.update(|_| ()), None);
}

#[test]
fn logout_reports_token_that_survives_in_store() {
    let store = StickyStore(MemoryStore::default());
    let mut state = ClientState::new(Session::restored(store.clone()));
    state.session.login(Token::parse("T1").unwrap()).unwrap();

    assert_eq!(state.logout(), Err(StoreError::Write("read-only".to_owned())));
    assert!(!state.session.is_authenticated());
    assert!(state.workspace.records().is_empty());

    // The next start would restore it, which is why the caller must hear about it.
    let reloaded = Session::restored(store);
    assert!(reloaded.is_authenticated());
}

use super::*;
use gallery::Session;

fn store_in(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("nested").join("token"))
}

#[test]
fn missing_file_loads_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(store_in(&dir).load(), Ok(None));
}

#[test]
fn save_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("T1").unwrap();
    assert_eq!(store.load(), Ok(Some("T1".to_owned())));
}

#[test]
fn blank_file_loads_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("  \n").unwrap();
    assert_eq!(store.load(), Ok(None));
}

#[test]
fn clear_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("T1").unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());
}

#[test]
fn session_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = Session::restored(store_in(&dir));
    first.login(gallery::Token::parse("T1").unwrap()).unwrap();

    let second = Session::restored(store_in(&dir));
    assert_eq!(second.current_token().map(gallery::Token::as_str), Some("T1"));
}

#[cfg(unix)]
#[test]
fn token_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save("T1").unwrap();
    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn existing_readable_token_file_is_tightened_before_write() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "OLD-TOKEN-THAT-IS-LONGER").unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    store.save("T2").unwrap();
    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(store.load(), Ok(Some("T2".to_owned())));
}

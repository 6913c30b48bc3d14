use super::*;

#[test]
fn store_is_unavailable_outside_browser() {
    let store = BrowserStore;
    assert_eq!(store.load(), Err(StoreError::Unavailable));
    assert_eq!(store.save("T1"), Err(StoreError::Unavailable));
    assert_eq!(store.clear(), Err(StoreError::Unavailable));
}

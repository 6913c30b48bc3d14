use super::*;

#[test]
fn after_registration_flags_login_page() {
    assert_eq!(after_registration("/"), "/?registered=1");
}

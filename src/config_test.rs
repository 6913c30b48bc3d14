use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[test]
fn port_defaults_when_unset() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.bind_addr(), "0.0.0.0:3000");
}

#[test]
fn port_is_read_from_env() {
    let config = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
    assert_eq!(config.port, 8080);
}

#[test]
fn bad_port_is_rejected() {
    assert_eq!(
        Config::from_lookup(lookup(&[("PORT", "http")])),
        Err(ConfigError::InvalidPort("http".to_owned()))
    );
}

use std::collections::HashMap;
use std::time::Duration;

use brokerwire::config::{DEFAULT_ADDR, DEFAULT_READ_TIMEOUT};
use brokerwire::protocol::DEFAULT_MAX_FRAME_BYTES;
use brokerwire::{BrokerWireError, ServerConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_listen_on_kafka_port() {
    let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.addr, DEFAULT_ADDR);
    assert_eq!(config.addr, "0.0.0.0:9092");
    assert_eq!(config.max_frame_bytes, DEFAULT_MAX_FRAME_BYTES);
    assert_eq!(config.read_timeout, Some(DEFAULT_READ_TIMEOUT));
}

#[test]
fn env_overrides_apply() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("BROKERWIRE_ADDR", "127.0.0.1:19092"),
        ("BROKERWIRE_MAX_FRAME_BYTES", "65536"),
        ("BROKERWIRE_READ_TIMEOUT_MS", "1500"),
    ]))
    .unwrap();
    assert_eq!(config.addr, "127.0.0.1:19092");
    assert_eq!(config.max_frame_bytes, 65536);
    assert_eq!(config.read_timeout, Some(Duration::from_millis(1500)));
}

#[test]
fn zero_timeout_disables_it() {
    let config =
        ServerConfig::from_lookup(lookup(&[("BROKERWIRE_READ_TIMEOUT_MS", "0")])).unwrap();
    assert_eq!(config.read_timeout, None);
}

#[test]
fn invalid_values_are_config_errors() {
    for (key, value) in [
        ("BROKERWIRE_MAX_FRAME_BYTES", "lots"),
        ("BROKERWIRE_MAX_FRAME_BYTES", "0"),
        ("BROKERWIRE_READ_TIMEOUT_MS", "-5"),
    ] {
        let err = ServerConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, BrokerWireError::Config(_)), "{}={}", key, value);
    }
}

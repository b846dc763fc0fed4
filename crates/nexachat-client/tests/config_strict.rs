#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use nexachat_client::config;
use nexachat_core::NexaChatError;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
client:
  endpoint: "ws://localhost:5050"
  endpiont: "ws://typo" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.category().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.client.endpoint, "ws://localhost:5050");
    assert_eq!(cfg.client.share_origin, "http://localhost:5173");
    assert_eq!(cfg.client.event_buffer, 256);
    assert_eq!(cfg.client.connect_timeout_ms, 10000);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err, NexaChatError::UnsupportedVersion);
}

#[test]
fn http_endpoint_is_dialed_as_websocket() {
    let cfg = config::load_from_str(
        r#"
version: 1
client:
  endpoint: "http://localhost:5050"
"#,
    )
    .unwrap();
    assert_eq!(cfg.client.ws_endpoint(), "ws://localhost:5050");

    let cfg = config::load_from_str(
        r#"
version: 1
client:
  endpoint: "https://relay.nexa.chat/ws"
"#,
    )
    .unwrap();
    assert_eq!(cfg.client.ws_endpoint(), "wss://relay.nexa.chat/ws");
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        "client: { endpoint: \"tcp://localhost:5050\" }",
        "client: { event_buffer: 0 }",
        "client: { connect_timeout_ms: 10 }",
        "client: { share_origin: \"  \" }",
    ] {
        let doc = format!("version: 1\n{bad}\n");
        let err = config::load_from_str(&doc).expect_err(bad);
        assert_eq!(err.category().as_str(), "CONFIG", "doc={doc}");
    }
}

#[test]
fn missing_file_is_a_config_error() {
    let err = config::load_from_file("/nonexistent/nexachat.yaml").expect_err("must fail");
    assert_eq!(err.category().as_str(), "CONFIG");
}

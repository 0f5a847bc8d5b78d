use std::time::Duration;

use session_bridge_core::EventName;

use super::*;

#[test]
fn empty_document_uses_defaults() {
    let config = BridgeConfig::from_toml("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.trigger.path, "/webhook");
    assert_eq!(config.trigger.events, vec!["message"]);
    assert!(config.forward.url.is_none());
    assert!(!config.dispatch.continue_on_fail);
    assert!(!config.telemetry.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn full_document() {
    let config = BridgeConfig::from_toml(
        r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [session]
        base_url = "http://session:8080"
        api_key = "file-key"
        timeout_seconds = 5

        [trigger]
        path = "/hooks/session"
        events = ["message", "reactionAdded"]

        [forward]
        url = "http://downstream/events"

        [dispatch]
        continue_on_fail = true
        "#,
    )
    .unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.trigger.path, "/hooks/session");
    assert_eq!(
        config.forward.url.as_deref(),
        Some("http://downstream/events")
    );

    let subscription = config.trigger.subscription().unwrap();
    assert!(subscription.contains(EventName::Message));
    assert!(subscription.contains(EventName::ReactionAdded));
    assert!(!subscription.contains(EventName::Call));

    let client = config.session.to_client_config().unwrap();
    assert_eq!(client.base_url, "http://session:8080");
    assert_eq!(client.api_key, "file-key");
    assert_eq!(client.timeout, Duration::from_secs(5));

    assert!(config.dispatcher_config().isolate_failures);
}

#[test]
fn unknown_event_name_fails_validation() {
    let config = BridgeConfig::from_toml("[trigger]\nevents = [\"typing\"]").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("typing"), "got: {err}");
}

#[test]
fn empty_event_list_is_allowed() {
    let config = BridgeConfig::from_toml("[trigger]\nevents = []").unwrap();
    assert!(config.validate().is_ok());
    assert!(config.trigger.subscription().unwrap().is_empty());
}

#[test]
fn trigger_path_must_be_absolute() {
    let config = BridgeConfig::from_toml("[trigger]\npath = \"webhook\"").unwrap();
    assert!(matches!(config.validate(), Err(ServerError::Config(_))));

    let config = BridgeConfig::from_toml("[trigger]\npath = \"/health\"").unwrap();
    assert!(matches!(config.validate(), Err(ServerError::Config(_))));
}

#[test]
fn trigger_path_rejects_route_syntax() {
    for path in ["/hooks/{", "/hooks/{id}", "/hooks/}", "/hooks/*rest"] {
        let config = BridgeConfig::from_toml(&format!("[trigger]\npath = \"{path}\"")).unwrap();
        match config.validate() {
            Err(ServerError::Config(msg)) => assert!(msg.contains(path), "message was: {msg}"),
            other => panic!("expected a config error for {path}, got {other:?}"),
        }
    }
}

#[test]
fn env_key_overrides_file_key() {
    let mut config =
        BridgeConfig::from_toml("[session]\nbase_url = \"http://s\"\napi_key = \"file-key\"")
            .unwrap();

    config.apply_api_key_override(Some(String::new()));
    assert_eq!(config.session.api_key.as_deref(), Some("file-key"));

    config.apply_api_key_override(Some("env-key".into()));
    assert_eq!(config.session.to_client_config().unwrap().api_key, "env-key");
}

#[test]
fn session_requires_url_and_key() {
    let config = BridgeConfig::from_toml("").unwrap();
    assert!(config.session.to_client_config().is_err());

    let config = BridgeConfig::from_toml("[session]\nbase_url = \"http://s\"").unwrap();
    let err = config.session.to_client_config().unwrap_err();
    assert!(err.to_string().contains(API_KEY_ENV));
}

#[test]
fn session_default_timeout() {
    let config =
        BridgeConfig::from_toml("[session]\nbase_url = \"http://s\"\napi_key = \"k\"").unwrap();
    assert_eq!(
        config.session.to_client_config().unwrap().timeout,
        Duration::from_secs(30)
    );
}

#[test]
fn session_debug_redacts_api_key() {
    let config =
        BridgeConfig::from_toml("[session]\nbase_url = \"http://s\"\napi_key = \"super-secret\"")
            .unwrap();
    let debug = format!("{config:?}");
    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("super-secret"));
}

#[test]
fn missing_file_loads_defaults() {
    let config = BridgeConfig::load("/nonexistent/session-bridge.toml").unwrap();
    assert_eq!(config.trigger.path, "/webhook");
}

#[test]
fn telemetry_defaults() {
    let config: TelemetryConfig = toml::from_str("").unwrap();
    assert!(!config.enabled);
    assert_eq!(config.endpoint, "http://localhost:4317");
    assert_eq!(config.service_name, "session-bridge");
    assert!((config.sample_ratio - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.protocol, "grpc");
    assert_eq!(config.timeout_seconds, 10);
}

#[test]
fn telemetry_custom_config() {
    let config: TelemetryConfig = toml::from_str(
        r#"
        enabled = true
        endpoint = "http://collector:4318"
        protocol = "http"
        sample_ratio = 0.5

        [resource_attributes]
        "deployment.environment" = "staging"
        "#,
    )
    .unwrap();
    assert!(config.enabled);
    assert_eq!(config.protocol, "http");
    assert!((config.sample_ratio - 0.5).abs() < f64::EPSILON);
    assert_eq!(
        config.resource_attributes.get("deployment.environment").map(String::as_str),
        Some("staging")
    );
}

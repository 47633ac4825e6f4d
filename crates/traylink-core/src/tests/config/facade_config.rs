use crate::{DispatchPolicy, EventKind, FacadeConfig, StopTimeoutPolicy};

use std::time::Duration;

/// WHAT: An empty document yields the defaults
/// WHY: Every field is optional in the config file
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_toml_when_parsing_then_defaults() {
    // Given: An empty document
    let toml_str = "";

    // When: Parsing it
    let config: FacadeConfig = toml::from_str(toml_str).unwrap();

    // Then: It equals the default configuration
    assert_eq!(config, FacadeConfig::default());
    assert_eq!(config.readiness_timeout(), Duration::from_secs(3));
    assert_eq!(config.stop_timeout(), Duration::from_secs(2));
    assert_eq!(config.marshal_timeout(), Duration::from_secs(5));
    assert_eq!(config.on_stop_timeout, StopTimeoutPolicy::Abandon);
    assert_eq!(
        config.callbacks.for_kind(EventKind::MenuTriggered),
        DispatchPolicy::Worker
    );
    assert_eq!(
        config.callbacks.for_kind(EventKind::Activate),
        DispatchPolicy::Inline
    );
}

/// WHAT: Partial settings override only what they name
/// WHY: Users tune one timeout without restating the rest
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_toml_when_parsing_then_named_fields_override() {
    // Given: A document setting a few fields
    let toml_str = r#"
        stop_timeout_ms = 500
        on_stop_timeout = "terminate"

        [callbacks]
        menu_triggered = "inline"
    "#;

    // When: Parsing it
    let config: FacadeConfig = toml::from_str(toml_str).unwrap();

    // Then: Named fields changed, others kept defaults
    assert_eq!(config.stop_timeout_ms, 500);
    assert_eq!(config.on_stop_timeout, StopTimeoutPolicy::Terminate);
    assert_eq!(config.callbacks.menu_triggered, DispatchPolicy::Inline);
    assert_eq!(config.callbacks.scroll, DispatchPolicy::Inline);
    assert_eq!(config.readiness_timeout_ms, 3_000);
}

/// WHAT: Unknown policy names are rejected
/// WHY: A typo must not silently fall back to a default
#[test]
fn given_unknown_policy_when_parsing_then_error() {
    // Given: A misspelled policy
    let toml_str = r#"on_stop_timeout = "kill""#;

    // When: Parsing it
    let result = toml::from_str::<FacadeConfig>(toml_str);

    // Then: Parsing fails
    assert!(result.is_err());
}

use std::collections::HashMap;

use stagescope::config::{
    init_tracing, parse_flag, ConfigError, TelemetryConfig, INSTRUMENTATION_ENV, LOG_FILTER_ENV,
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_flag_values() {
    assert_eq!(parse_flag("k", "ON"), Ok(true));
    assert_eq!(parse_flag("k", " 0 "), Ok(false));
    assert!(matches!(parse_flag("k", "maybe"), Err(ConfigError::InvalidFlag { .. })));
}

#[test]
fn test_lookup_overrides_defaults() {
    let config = TelemetryConfig::from_lookup(lookup(&[
        (INSTRUMENTATION_ENV, "true"),
        (LOG_FILTER_ENV, "stagescope=debug"),
    ]));
    assert!(config.instrumentation);
    assert_eq!(config.log_filter, "stagescope=debug");
}

#[test]
fn test_bad_flag_keeps_default() {
    let config = TelemetryConfig::from_lookup(lookup(&[(INSTRUMENTATION_ENV, "sometimes")]));
    assert!(!config.instrumentation);
}

#[test]
fn test_json_fills_missing_fields() {
    let config = TelemetryConfig::from_json(r#"{ "instrumentation": true }"#).unwrap();
    assert!(config.instrumentation);
    assert_eq!(config.record_capacity, 10_000);
    assert!(TelemetryConfig::from_json("{").is_err());
}

#[test]
fn test_init_tracing_twice_keeps_first_subscriber() {
    let config = TelemetryConfig { log_filter: "not a [valid filter".into(), ..Default::default() };
    init_tracing(&config);
    init_tracing(&TelemetryConfig::default());
    tracing::info!("still logging after repeated init");
}

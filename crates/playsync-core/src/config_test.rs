use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;
use std::time::Duration;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.package_name, PLACEHOLDER_PACKAGE_NAME);
    assert!(cfg.uses_placeholder_package());
    assert_eq!(
        cfg.service_account_key_path,
        Path::new("service-account-key.json")
    );
    assert!(cfg.catalog_path.is_none());
    assert_eq!(
        cfg.api_base_url,
        "https://androidpublisher.googleapis.com/"
    );
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.inter_call_delay_ms, 500);
    assert_eq!(cfg.user_agent, "playsync/0.1 (catalog-provisioning)");
    assert_eq!(cfg.log_level, "warn");
}

#[test]
fn package_name_override_clears_placeholder() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_PACKAGE_NAME", "com.example.readings");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.package_name, "com.example.readings");
    assert!(!cfg.uses_placeholder_package());
}

#[test]
fn package_name_without_dot_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_PACKAGE_NAME", "readings");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLAYSYNC_PACKAGE_NAME"),
        "expected InvalidEnvVar(PLAYSYNC_PACKAGE_NAME), got: {result:?}"
    );
}

#[test]
fn package_name_segment_starting_with_digit_is_rejected() {
    assert!(validate_package_name("com.1example.app").is_err());
    assert!(validate_package_name("com..app").is_err());
    assert!(validate_package_name("com.example.my_app2").is_ok());
}

#[test]
fn catalog_path_is_read_when_set() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_CATALOG_PATH", "./config/catalog.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.catalog_path.as_deref(),
        Some(Path::new("./config/catalog.yaml"))
    );
}

#[test]
fn blank_catalog_path_means_builtin() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_CATALOG_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.catalog_path.is_none());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLAYSYNC_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLAYSYNC_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_REQUEST_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn inter_call_delay_can_be_raised() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_INTER_CALL_DELAY_MS", "1500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.inter_call_delay_ms, 1500);
    assert_eq!(cfg.inter_call_delay(), Duration::from_millis(1500));
}

#[test]
fn inter_call_delay_below_floor_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_INTER_CALL_DELAY_MS", "100");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLAYSYNC_INTER_CALL_DELAY_MS"),
        "expected InvalidEnvVar(PLAYSYNC_INTER_CALL_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn inter_call_delay_is_clamped_when_struct_is_built_directly() {
    let map: HashMap<&str, &str> = HashMap::new();
    let mut cfg = build_app_config(lookup_from_map(&map)).unwrap();
    cfg.inter_call_delay_ms = 0;
    assert_eq!(cfg.inter_call_delay(), Duration::from_millis(500));
}

#[test]
fn log_level_and_user_agent_overrides() {
    let mut map = HashMap::new();
    map.insert("PLAYSYNC_LOG_LEVEL", "debug");
    map.insert("PLAYSYNC_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

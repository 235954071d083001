use crate::config::{Config, Mode};
use crate::domain::analytics::AlignmentMethod;
use std::collections::HashMap;

fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(&|key| vars.get(key).cloned())
}

#[test]
fn test_config_defaults() {
    let config = load(&[]).unwrap();

    assert_eq!(config.mode, Mode::Http);
    assert_eq!(config.query.default_window_minutes, 60);
    assert!(config.observability.enabled);

    let settings = config.to_query_settings();
    assert_eq!(settings.alignment.tolerance.as_millis(), 600_000);
    assert_eq!(settings.fetch_timeout.as_millis(), 8_000);
}

#[test]
fn test_config_overrides() {
    let config = load(&[
        ("MODE", "mock"),
        ("PRICE_API_BASE_URL", "http://localhost:8080/api"),
        ("PRICE_API_TOKEN", "secret"),
        ("PRICE_API_MAX_RETRIES", "2"),
        ("ALIGNMENT_TOLERANCE_MS", "30000"),
        ("ALIGNMENT_METHOD", "indexed"),
        ("DEFAULT_WINDOW_MINUTES", "15"),
        ("OBSERVABILITY_ENABLED", "false"),
    ])
    .unwrap();

    assert_eq!(config.mode, Mode::Mock);
    assert_eq!(config.provider.base_url, "http://localhost:8080/api");
    assert_eq!(config.provider.api_token, "secret");
    assert_eq!(config.provider.max_retries, 2);
    assert_eq!(config.query.default_window_minutes, 15);
    assert!(!config.observability.enabled);

    let settings = config.to_query_settings();
    assert_eq!(settings.alignment.tolerance.as_millis(), 30_000);
    assert_eq!(settings.alignment.method, AlignmentMethod::Indexed);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(load(&[("MODE", "websocket")]).is_err());
    assert!(load(&[("ALIGNMENT_TOLERANCE_MS", "-5")]).is_err());

    let err = load(&[("FETCH_TIMEOUT_MS", "soon")]).unwrap_err();
    assert!(format!("{:#}", err).contains("FETCH_TIMEOUT_MS"));
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use nuodbaas_provider::config::resolver::{
    self, ENV_ALLOW_DESTRUCTIVE_REPLACE, ENV_PASSWORD, ENV_URL_BASE, ENV_USER,
};
use nuodbaas_provider::config::timeouts::{parse_duration, Operation, TimeoutPolicy};
use nuodbaas_provider::config::ProviderConfig;
use nuodbaas_provider::model::ResourceType;

// Environment mutations must not interleave across test threads.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        ENV_URL_BASE,
        ENV_USER,
        ENV_PASSWORD,
        ENV_ALLOW_DESTRUCTIVE_REPLACE,
    ] {
        std::env::remove_var(key);
    }
}

fn base_config() -> ProviderConfig {
    ProviderConfig {
        url_base: Some("http://localhost:8080".to_string()),
        ..ProviderConfig::default()
    }
}

#[test]
fn test_parse_duration_forms() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
    assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
    assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
}

#[test]
fn test_parse_duration_rejects_garbage() {
    assert!(parse_duration("").is_err());
    assert!(parse_duration("abc").is_err());
    assert!(parse_duration("5").is_err());
    assert!(parse_duration("-1s").is_err());
    assert!(parse_duration("1s extra").is_err());
}

#[test]
fn test_timeout_resolution_order() {
    let mut raw: HashMap<String, HashMap<String, String>> = HashMap::new();
    raw.insert(
        "database".to_string(),
        HashMap::from([("create".to_string(), "10s".to_string())]),
    );
    raw.insert(
        "default".to_string(),
        HashMap::from([
            ("create".to_string(), "20s".to_string()),
            ("delete".to_string(), "3s".to_string()),
        ]),
    );
    let policy = TimeoutPolicy::from_config(&raw).unwrap();

    // Per-type entry wins.
    assert_eq!(
        policy.resolve(ResourceType::Database, Operation::Create),
        Duration::from_secs(10)
    );
    // Falls back to the default entry.
    assert_eq!(
        policy.resolve(ResourceType::Project, Operation::Create),
        Duration::from_secs(20)
    );
    assert_eq!(
        policy.resolve(ResourceType::Database, Operation::Delete),
        Duration::from_secs(3)
    );
    // Falls back to the library default.
    assert_eq!(
        policy.resolve(ResourceType::Project, Operation::Update),
        Duration::from_secs(300)
    );
}

#[test]
fn test_timeout_zero_is_allowed() {
    let raw = HashMap::from([(
        "backup".to_string(),
        HashMap::from([("create".to_string(), "0".to_string())]),
    )]);
    let policy = TimeoutPolicy::from_config(&raw).unwrap();
    assert_eq!(
        policy.resolve(ResourceType::Backup, Operation::Create),
        Duration::ZERO
    );
}

#[test]
fn test_timeout_unknown_resource_type_rejected() {
    let raw = HashMap::from([(
        "cluster".to_string(),
        HashMap::from([("create".to_string(), "10s".to_string())]),
    )]);
    let err = TimeoutPolicy::from_config(&raw).unwrap_err();
    assert!(err.to_string().contains("unknown resource type 'cluster'"));
}

#[test]
fn test_timeout_unknown_operation_rejected() {
    let raw = HashMap::from([(
        "default".to_string(),
        HashMap::from([("reboot".to_string(), "10s".to_string())]),
    )]);
    assert!(TimeoutPolicy::from_config(&raw).is_err());
}

#[test]
fn test_resolve_requires_url() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let err = resolver::resolve(ProviderConfig::default()).unwrap_err();
    assert!(err.to_string().contains(ENV_URL_BASE));
}

#[test]
fn test_resolve_rejects_url_without_scheme() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let config = ProviderConfig {
        url_base: Some("localhost:8080".to_string()),
        ..ProviderConfig::default()
    };
    assert!(resolver::resolve(config).is_err());
}

#[test]
fn test_resolve_rejects_partial_credentials() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let config = ProviderConfig {
        user: Some("acme/admin".to_string()),
        ..base_config()
    };
    let err = resolver::resolve(config).unwrap_err();
    assert!(err.to_string().contains("without a password"));

    let config = ProviderConfig {
        password: Some("secret".to_string()),
        ..base_config()
    };
    let err = resolver::resolve(config).unwrap_err();
    assert!(err.to_string().contains("without a user"));
}

#[test]
fn test_resolve_rejects_malformed_user() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    for user in ["admin", "acme/admin/extra", "/admin", "acme/"] {
        let config = ProviderConfig {
            user: Some(user.to_string()),
            password: Some("secret".to_string()),
            ..base_config()
        };
        assert!(
            resolver::resolve(config).is_err(),
            "user '{}' should be rejected",
            user
        );
    }
}

#[test]
fn test_resolve_accepts_valid_credentials() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let config = ProviderConfig {
        user: Some("acme/admin".to_string()),
        password: Some("secret".to_string()),
        ..base_config()
    };
    let bundle = resolver::resolve(config).unwrap();
    assert!(!bundle.allow_destructive_replace);
}

#[test]
fn test_resolve_environment_fallback() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    std::env::set_var(ENV_URL_BASE, "http://cp.example.com/api");
    std::env::set_var(ENV_USER, "acme/admin");
    std::env::set_var(ENV_PASSWORD, "secret");
    std::env::set_var(ENV_ALLOW_DESTRUCTIVE_REPLACE, "true");

    let bundle = resolver::resolve(ProviderConfig::default()).unwrap();
    assert!(bundle.allow_destructive_replace);
    assert_eq!(bundle.client.base_url().host_str(), Some("cp.example.com"));
    clear_env();
}

#[test]
fn test_resolve_explicit_config_beats_environment() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    std::env::set_var(ENV_URL_BASE, "http://from-env.example.com");
    std::env::set_var(ENV_ALLOW_DESTRUCTIVE_REPLACE, "true");

    let config = ProviderConfig {
        url_base: Some("http://explicit.example.com".to_string()),
        allow_destructive_replace: Some(false),
        ..ProviderConfig::default()
    };
    let bundle = resolver::resolve(config).unwrap();
    assert_eq!(
        bundle.client.base_url().host_str(),
        Some("explicit.example.com")
    );
    assert!(!bundle.allow_destructive_replace);
    clear_env();
}

#![cfg(feature = "cli")]

use clap::Parser;
use newrelic_mute::core::ConfigProvider;
use newrelic_mute::utils::validation::Validate;
use newrelic_mute::{CliConfig, SecretBackend, Settings};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn resolve_layers_file_then_flags() {
    let file = config_file(
        r#"
[newrelic]
api_endpoint = "https://api.eu.newrelic.com/graphql"
timeout_seconds = 30

[secrets]
backend = "env"
secret_id = "nr/staging"

[store]
path = "/srv/mute-rules"
"#,
    );

    let cli = CliConfig::try_parse_from([
        "newrelic-mute",
        "--config",
        file.path().to_str().unwrap(),
        "--timeout-seconds",
        "5",
        "enable",
        "--deployment-id",
        "acme-prod",
        "--customer-name",
        "Acme",
    ])
    .unwrap();

    let settings = Settings::resolve(&cli).unwrap();
    assert_eq!(settings.api_endpoint(), "https://api.eu.newrelic.com/graphql");
    assert_eq!(settings.secret_id(), "nr/staging");
    assert_eq!(settings.secret_backend, SecretBackend::Env);
    assert_eq!(settings.store_path, "/srv/mute-rules");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
    assert!(settings.validate().is_ok());
}

#[test]
fn resolve_rejects_invalid_file() {
    let file = config_file("[newrelic]\napi_endpoint = \"ftp://nope\"\n");

    let cli = CliConfig::try_parse_from([
        "newrelic-mute",
        "--config",
        file.path().to_str().unwrap(),
        "create",
        "--deployment-id",
        "d1",
        "--customer-name",
        "Acme",
    ])
    .unwrap();

    assert!(Settings::resolve(&cli).is_err());
}

#[test]
fn resolve_without_file_uses_defaults() {
    let cli = CliConfig::try_parse_from([
        "newrelic-mute",
        "cycle",
        "--deployment-id",
        "d1",
        "--customer-name",
        "Acme",
    ])
    .unwrap();

    let settings = Settings::resolve(&cli).unwrap();
    assert_eq!(settings, Settings::default());
}

use std::fs;
use std::time::Duration;

use bookwell_config::sources::EnvConfig;
use bookwell_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("bookwell.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let load = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .load()
        .unwrap();
    let config = load.config;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.database.url, None);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.auth.admin_role_id, 2);
    assert_eq!(config.auth.superadmin_role_id, 3);
    assert!(!config.listing.restrict_target_to_self);
    assert_eq!(config.listing.default_per_page, 15);
    assert_eq!(config.history.limit, 50);
    assert_eq!(config.notifications.timeout, Duration::from_secs(5));
    assert!(config.metadata.config_path.is_none());

    let messages: Vec<_> = load.warnings.iter().map(|w| w.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("No bookwell.toml")));
    assert!(messages.iter().any(|m| m.contains("DATABASE_URL")));
}

#[test]
fn file_values_are_used() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [server]
        port = 9000

        [database]
        url = "postgres://bookwell@localhost/bookwell"

        [auth]
        admin_role_id = 5
        superadmin_role_id = 6

        [listing]
        restrict_target_to_self = true
        default_per_page = 25

        [notifications]
        push_webhook_url = "http://localhost:7000/push"
        timeout = "1500ms"
        "#,
    );

    let config = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(&path)
        .load()
        .unwrap()
        .config;

    assert_eq!(config.server.port, 9000);
    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://bookwell@localhost/bookwell")
    );
    assert_eq!(config.auth.admin_role_id, 5);
    assert!(config.listing.restrict_target_to_self);
    assert_eq!(config.listing.default_per_page, 25);
    assert_eq!(
        config.notifications.push_webhook_url.as_ref().map(|u| u.path()),
        Some("/push")
    );
    assert!(config.notifications.sms_webhook_url.is_none());
    assert_eq!(config.notifications.timeout, Duration::from_millis(1500));
    assert_eq!(config.metadata.config_path, Some(path));
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server]\nport = 9000\nhost = \"127.0.0.1\"\n");

    let env = EnvConfig {
        server_port: Some(9100),
        admin_role_id: Some(10),
        superadmin_role_id: Some(11),
        ..Default::default()
    };
    let config = ConfigLoader::new()
        .with_env(env)
        .with_config_path(&path)
        .load()
        .unwrap()
        .config;

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.auth.admin_role_id, 10);
    assert_eq!(config.auth.superadmin_role_id, 11);
}

#[test]
fn explicit_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(&missing)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { path } if path == missing));
}

#[test]
fn env_config_path_is_honoured() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[history]\nlimit = 5\n");

    let env = EnvConfig {
        config_path: Some(path),
        ..Default::default()
    };
    let config = ConfigLoader::new().with_env(env).load().unwrap().config;
    assert_eq!(config.history.limit, 5);
}

#[test]
fn guard_rails_reject_bad_values() {
    let dir = TempDir::new().unwrap();

    let cases = [
        ("[server]\nport = 0\n", ConfigGuardRailError::EphemeralPort),
        (
            "[listing]\ndefault_per_page = 0\n",
            ConfigGuardRailError::PerPageOutOfRange(0),
        ),
        ("[history]\nlimit = -1\n", ConfigGuardRailError::HistoryLimit(-1)),
        (
            "[auth]\nadmin_role_id = 4\nsuperadmin_role_id = 4\n",
            ConfigGuardRailError::RoleIdCollision(4),
        ),
    ];

    for (contents, expected) in cases {
        let path = write_config(&dir, contents);
        let err = ConfigLoader::new()
            .with_env(EnvConfig::default())
            .with_config_path(&path)
            .load()
            .unwrap_err();
        match err {
            ConfigLoadError::GuardRail(actual) => assert_eq!(actual, expected),
            other => panic!("unexpected error for {contents:?}: {other}"),
        }
    }
}

#[test]
fn malformed_webhook_and_timeout_are_reported() {
    let env = EnvConfig {
        sms_webhook_url: Some("not a url".into()),
        ..Default::default()
    };
    let err = ConfigLoader::new().with_env(env).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidWebhookUrl {
            field: "sms_webhook_url",
            ..
        }
    ));

    let env = EnvConfig {
        notification_timeout: Some("soon".into()),
        ..Default::default()
    };
    let err = ConfigLoader::new().with_env(env).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidTimeout { .. }));
}

#[test]
fn unparsable_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server\nport = 1");

    let err = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(&path)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

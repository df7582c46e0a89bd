use std::{fs, path::PathBuf};

use shelf_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, StorageBackend,
    models::sources::EnvConfig,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("shelf.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn memory_env() -> EnvConfig {
    EnvConfig {
        storage_backend: Some("memory".into()),
        ..EnvConfig::default()
    }
}

#[test]
fn file_values_apply_over_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
        [server]
        host = "127.0.0.1"
        port = 8088

        [database]
        url = "postgres://shelf@localhost/shelf"
        max_connections = 4

        [circulation]
        default_loan_days = 21
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .expect("config loads");
    let config = load.config;

    assert_eq!(config.server.bind_address(), "127.0.0.1:8088");
    assert_eq!(config.storage.backend, StorageBackend::Postgres);
    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://shelf@localhost/shelf")
    );
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.database.min_connections, 1);
    assert_eq!(config.circulation.default_loan_days, 21);
    assert_eq!(config.circulation.max_loan_days, 365);
    assert_eq!(config.metadata.config_path, Some(path));
    assert!(!config.metadata.env_file_loaded);
    assert!(load.warnings.is_empty());
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
        dev_mode = false

        [server]
        port = 8088

        [storage]
        backend = "postgres"

        [cors]
        allowed_origins = ["https://library.test"]
        "#,
    );

    let env = EnvConfig {
        server_port: Some(9000),
        storage_backend: Some("memory".into()),
        cors_allowed_origins: Some(vec!["https://other.test".into()]),
        dev_mode: Some(true),
        max_loan_days: Some(30),
        ..EnvConfig::default()
    };

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env, true)
        .expect("config loads")
        .config;

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.cors.allowed_origins, vec!["https://other.test"]);
    assert!(config.dev_mode);
    assert_eq!(config.circulation.max_loan_days, 30);
    assert!(config.metadata.env_file_loaded);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let err = ConfigLoader::new()
        .with_config_path(&missing)
        .load_with_env(memory_env(), false)
        .unwrap_err();

    assert!(
        matches!(err, ConfigLoadError::MissingConfig { ref path } if *path == missing)
    );
}

#[test]
fn config_path_from_environment_is_used() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nport = 7070\n");
    let env = EnvConfig {
        config_path: Some(path.clone()),
        ..memory_env()
    };

    let config = ConfigLoader::new()
        .load_with_env(env, false)
        .expect("config loads")
        .config;

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.metadata.config_path, Some(path));
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server\nport = ");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(memory_env(), false)
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn unknown_backend_is_rejected() {
    let env = EnvConfig {
        storage_backend: Some("sqlite".into()),
        ..EnvConfig::default()
    };

    let err = ConfigLoader::new().load_with_env(env, false).unwrap_err();

    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue {
            key: "SHELF_STORAGE",
            ..
        }
    ));
}

#[test]
fn postgres_without_url_fails_guard_rails() {
    let err = ConfigLoader::new()
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();

    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MissingDatabaseUrl)
    ));
}

#[test]
fn memory_backend_without_file_collects_warnings() {
    let load = ConfigLoader::new()
        .load_with_env(memory_env(), false)
        .expect("config loads");

    assert_eq!(load.config.storage.backend, StorageBackend::Memory);
    assert!(load.config.metadata.config_path.is_none());
    // One for the missing file, one for the volatile backend.
    assert_eq!(load.warnings.len(), 2);
}

#[test]
fn env_file_feeds_the_environment() {
    let dir = TempDir::new().expect("tempdir");
    let env_file = dir.path().join("shelf.env");
    fs::write(&env_file, "SHELF_STORAGE=memory\n").expect("write env file");

    let load = ConfigLoader::new()
        .with_env_file(&env_file)
        .with_config_path(write_config(&dir, ""))
        .load()
        .expect("config loads");

    assert!(load.config.metadata.env_file_loaded);
    assert_eq!(load.config.storage.backend, StorageBackend::Memory);
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::{non_empty_var, parse_bool_var, parse_csv_var, parse_num_var};

use super::StorageBackend;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub circulation: FileCirculationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCirculationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_loan_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_loan_days: Option<u32>,
}

/// Environment-derived configuration values.
///
/// `storage_backend` stays raw so an unknown value surfaces as a load error
/// instead of silently falling back.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    pub db_min_connections: Option<u32>,
    pub storage_backend: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
    pub default_loan_days: Option<u32>,
    pub max_loan_days: Option<u32>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            server_host: non_empty_var("SERVER_HOST"),
            server_port: parse_num_var("SERVER_PORT"),
            database_url: non_empty_var("DATABASE_URL"),
            db_max_connections: parse_num_var("DB_MAX_CONNECTIONS"),
            db_min_connections: parse_num_var("DB_MIN_CONNECTIONS"),
            storage_backend: non_empty_var("SHELF_STORAGE"),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            dev_mode: parse_bool_var("DEV_MODE"),
            default_loan_days: parse_num_var("DEFAULT_LOAN_DAYS"),
            max_loan_days: parse_num_var("MAX_LOAN_DAYS"),
            config_path: non_empty_var("SHELF_CONFIG_PATH").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_missing_sections() {
        let file: FileConfig = toml::from_str(
            r#"
            dev_mode = true

            [server]
            port = 8080

            [storage]
            backend = "memory"
            "#,
        )
        .expect("parse");

        assert_eq!(file.server.port, Some(8080));
        assert!(file.server.host.is_none());
        assert_eq!(file.storage.backend, Some(StorageBackend::Memory));
        assert!(file.database.url.is_none());
        assert!(file.circulation.max_loan_days.is_none());
        assert_eq!(file.dev_mode, Some(true));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let parsed = toml::from_str::<FileConfig>("[redis]\nurl = \"x\"\n");
        assert!(parsed.is_err());
    }
}

use thiserror::Error;

use crate::models::{Config, StorageBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("DATABASE_URL is required when the postgres storage backend is selected")]
    MissingDatabaseUrl,
    #[error(
        "loan bounds must satisfy 1 <= default_loan_days ({default}) <= max_loan_days ({max})"
    )]
    InvalidLoanBounds { default: u32, max: u32 },
    #[error(
        "DB_MIN_CONNECTIONS ({min}) exceeds DB_MAX_CONNECTIONS ({max})"
    )]
    InvalidPoolBounds { min: u32, max: u32 },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let circulation = &config.circulation;
    if circulation.default_loan_days == 0
        || circulation.default_loan_days > circulation.max_loan_days
    {
        return Err(ConfigGuardRailError::InvalidLoanBounds {
            default: circulation.default_loan_days,
            max: circulation.max_loan_days,
        });
    }

    match config.storage.backend {
        StorageBackend::Postgres => {
            if config.database.url.is_none() {
                return Err(ConfigGuardRailError::MissingDatabaseUrl);
            }
            if config.database.min_connections
                > config.database.max_connections
            {
                return Err(ConfigGuardRailError::InvalidPoolBounds {
                    min: config.database.min_connections,
                    max: config.database.max_connections,
                });
            }
        }
        StorageBackend::Memory => {
            warnings.push_with_hint(
                "Using the in-memory storage backend; records are lost on shutdown",
                "Set SHELF_STORAGE=postgres and DATABASE_URL to persist data",
            );
            if config.database.url.is_some() {
                warnings.push(
                    "DATABASE_URL is set but ignored by the in-memory storage backend",
                );
            }
        }
    }

    if config.cors.is_wildcard_included() {
        if config.dev_mode {
            warnings.push("CORS wildcard origin enabled");
        } else {
            warnings.push_with_hint(
                "CORS wildcard origin enabled outside DEV_MODE; any site may call the API",
                "List explicit origins in CORS_ALLOWED_ORIGINS",
            );
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CirculationConfig, ConfigMetadata, CorsConfig, DatabaseConfig,
        ServerConfig, StorageConfig,
    };

    fn config(backend: StorageBackend, url: Option<&str>) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: url.map(str::to_string),
                max_connections: 10,
                min_connections: 1,
            },
            storage: StorageConfig { backend },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".into()],
            },
            circulation: CirculationConfig::default(),
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn postgres_requires_url() {
        let err = apply_guard_rails(&config(StorageBackend::Postgres, None))
            .unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::MissingDatabaseUrl));

        let warnings = apply_guard_rails(&config(
            StorageBackend::Postgres,
            Some("postgres://localhost/shelf"),
        ))
        .expect("valid");
        assert!(warnings.is_empty());
    }

    #[test]
    fn memory_backend_warns() {
        let warnings =
            apply_guard_rails(&config(StorageBackend::Memory, None))
                .expect("valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }

    #[test]
    fn loan_bounds_are_checked() {
        let mut cfg = config(StorageBackend::Memory, None);
        cfg.circulation = CirculationConfig {
            default_loan_days: 30,
            max_loan_days: 21,
        };
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::InvalidLoanBounds {
                default: 30,
                max: 21
            })
        ));

        cfg.circulation.default_loan_days = 0;
        assert!(apply_guard_rails(&cfg).is_err());

        cfg.circulation.default_loan_days = 21;
        assert!(apply_guard_rails(&cfg).is_ok());
    }

    #[test]
    fn wildcard_cors_is_a_warning() {
        let mut cfg =
            config(StorageBackend::Postgres, Some("postgres://localhost/x"));
        cfg.cors.allowed_origins.push("*".into());
        let warnings = apply_guard_rails(&cfg).expect("valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains("wildcard"));
    }

    #[test]
    fn pool_bounds_are_checked() {
        let mut cfg =
            config(StorageBackend::Postgres, Some("postgres://localhost/x"));
        cfg.database.min_connections = 20;
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::InvalidPoolBounds { min: 20, max: 10 })
        ));
    }
}

use anyhow::Context;
use tracing::{info, warn};

use shelf_config::{Config, StorageBackend};
use shelf_core::{AppUnitOfWork, InMemoryDatabase, PoolSettings, PostgresDatabase};

use super::app_state::AppState;

/// Connects the configured storage backend and wires the services.
///
/// Migrations run on every Postgres start; they are idempotent.
pub async fn build_state(config: Config) -> anyhow::Result<AppState> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let postgres = connect_postgres(&config).await?;
            postgres
                .migrate()
                .await
                .context("failed to apply database migrations")?;
            let uow = AppUnitOfWork::from_postgres(&postgres);
            info!("using postgres storage backend");
            Ok(AppState::new(uow, Some(postgres), config))
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage backend; data will not survive a restart");
            let uow = AppUnitOfWork::from_memory(InMemoryDatabase::new());
            Ok(AppState::new(uow, None, config))
        }
    }
}

pub async fn connect_postgres(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not configured")?;
    let settings = PoolSettings {
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
    };

    PostgresDatabase::connect(url, settings)
        .await
        .context("failed to connect to PostgreSQL")
}

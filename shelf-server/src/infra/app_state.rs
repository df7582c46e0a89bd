use std::{fmt, sync::Arc};

use shelf_config::{Config, StorageBackend};
use shelf_core::{
    AppUnitOfWork, CatalogService, CirculationService, DiscoveryService,
    LoanPolicy, PatronService, PostgresDatabase,
};

/// Services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub patrons: PatronService,
    pub circulation: CirculationService,
    pub discovery: DiscoveryService,
    /// Present only for the Postgres backend; probed by `/health`.
    pub postgres: Option<PostgresDatabase>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        uow: AppUnitOfWork,
        postgres: Option<PostgresDatabase>,
        config: Config,
    ) -> Self {
        let policy = LoanPolicy::new(
            config.circulation.default_loan_days,
            config.circulation.max_loan_days,
        );

        Self {
            catalog: CatalogService::new(uow.clone()),
            patrons: PatronService::new(uow.clone()),
            circulation: CirculationService::new(uow.clone(), policy),
            discovery: DiscoveryService::new(uow),
            postgres,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> StorageBackend {
        if self.postgres.is_some() {
            StorageBackend::Postgres
        } else {
            StorageBackend::Memory
        }
    }
}

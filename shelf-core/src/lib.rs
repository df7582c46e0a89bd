//! # Shelf Core
//!
//! Storage ports, adapters and domain services for the Shelf library
//! service.
//!
//! - [`database`]: repository ports with Postgres and in-memory adapters
//! - [`application`]: the [`AppUnitOfWork`] façade handed to services
//! - [`domain`]: catalog, patron, circulation and discovery services
//! - [`api_types`]: request and response payloads shared with the server
//!
//! The borrow/return lifecycle lives in [`domain::circulation`]; it is the
//! only place where copy counts change outside of plain CRUD.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Request and response payloads exchanged over HTTP
pub mod api_types;

/// Application-level composition (unit of work)
pub mod application;

/// Repository ports and storage adapters
pub mod database;

/// Domain services
pub mod domain;

/// Error taxonomy shared by every layer
pub mod error;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use application::{AppUnitOfWork, AppUnitOfWorkBuilder};
pub use database::{InMemoryDatabase, PoolSettings, PostgresDatabase};
pub use domain::{
    catalog::CatalogService,
    circulation::{CirculationService, LoanPolicy},
    discovery::DiscoveryService,
    patrons::PatronService,
};
pub use error::{ConflictKind, EntityKind, Result, ShelfError};
pub use shelf_model as model;

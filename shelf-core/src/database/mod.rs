//! Persistence layer: repository ports and the adapters implementing them.

pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use infrastructure::memory::InMemoryDatabase;
pub use postgres::{PoolSettings, PostgresDatabase};

//! Configuration for the Shelf service.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (including those loaded from `.env`). The server
//! binary applies CLI overrides on top of the loaded [`Config`].

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    CirculationConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

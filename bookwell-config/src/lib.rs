//! Configuration for the bookwell server.
//!
//! Values are layered: environment variables win over the TOML file, and the
//! file wins over built-in defaults. [`ConfigLoader`] performs the merge and
//! runs the guard rails in [`validation`].

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig, HistoryConfig,
    ListingConfig, LocaleConfig, NotificationConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod logging;
pub mod schema;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::schema::SchemaConfig;

use crate::error::AppError;

/// Prefix of environment variables that override file settings, e.g.
/// `VALIDACOES__DATABASE__URL`.
pub const ENV_PREFIX: &str = "VALIDACOES";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Schema bootstrap settings.
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file merged with `VALIDACOES__*`
    /// environment variables. A missing file is not an error as long as the
    /// environment supplies the required keys.
    pub fn load(path: &str) -> Result<Self, AppError> {
        Self::load_with_overlay(path, None)
    }

    /// Load the base file, then an optional environment-specific overlay,
    /// then environment variables. Later sources win.
    pub fn load_with_overlay(path: &str, overlay: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(overlay) = overlay {
            builder = builder.add_source(config::File::with_name(overlay).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

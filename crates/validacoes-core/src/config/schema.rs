//! Schema bootstrap configuration.

use serde::{Deserialize, Serialize};

/// Controls what the startup binary does with the `validacoes_gerais` schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Apply the idempotent DDL before anything else touches the database.
    #[serde(default = "default_true")]
    pub initialize_on_startup: bool,
    /// Inspect the catalog afterwards and fail if an object is missing.
    #[serde(default = "default_true")]
    pub verify_after_initialize: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            initialize_on_startup: true,
            verify_after_initialize: true,
        }
    }
}

fn default_true() -> bool {
    true
}

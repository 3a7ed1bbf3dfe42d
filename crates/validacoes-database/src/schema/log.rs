//! Progress reporting for the schema initializer.

use tracing::{error, info};

/// Sink for initializer progress and failures.
pub trait SchemaLog: Send + Sync {
    /// Progress message.
    fn info(&self, message: &str);

    /// Failure that aborts initialization.
    fn critical(&self, message: &str, error: &(dyn std::error::Error + 'static));
}

/// Forwards to `tracing`. `critical` is emitted at `ERROR` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl SchemaLog for TracingLog {
    fn info(&self, message: &str) {
        info!(target: "validacoes::schema", "{message}");
    }

    fn critical(&self, message: &str, error: &(dyn std::error::Error + 'static)) {
        error!(target: "validacoes::schema", error = %error, critical = true, "{message}");
    }
}

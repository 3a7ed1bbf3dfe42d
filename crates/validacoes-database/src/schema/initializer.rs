//! Idempotent bootstrap of the `validacoes_gerais` schema.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use crate::provider::{ConnectionProvider, SchemaConnection, StatementError};

use super::ddl::SchemaStage;
use super::error::{SchemaError, StagePanic};
use super::log::{SchemaLog, TracingLog};

/// Applies the table, indices, function and trigger, in that order, over one
/// borrowed connection.
///
/// Every stage is safe to re-run, so calling [`initialize`](Self::initialize)
/// on every process start is the intended use. A failed run may leave part of
/// the schema applied; the next successful run completes it.
pub struct SchemaInitializer {
    log: Arc<dyn SchemaLog>,
}

impl SchemaInitializer {
    /// Initializer reporting through `tracing`.
    pub fn new() -> Self {
        Self::with_log(Arc::new(TracingLog))
    }

    /// Initializer reporting through the given log.
    pub fn with_log(log: Arc<dyn SchemaLog>) -> Self {
        Self { log }
    }

    /// Ensure every schema object exists.
    ///
    /// The connection obtained from `provider` is released exactly once,
    /// whatever the outcome, and also if this future is dropped before it
    /// completes.
    pub async fn initialize<P>(&self, provider: &P) -> Result<(), SchemaError>
    where
        P: ConnectionProvider,
    {
        let connection = match provider.acquire().await {
            Ok(connection) => connection,
            Err(e) => {
                let err = SchemaError::Connectivity(e);
                self.log
                    .critical("No database connection available for schema initialization", &err);
                return Err(err);
            }
        };

        self.log.info(
            "Running DDL for table 'validacoes_gerais', its indices, function and trigger if missing",
        );

        let mut checkout = Checkout {
            provider,
            connection: Some(connection),
        };
        let outcome = match checkout.connection.as_mut() {
            Some(connection) => self.apply_stages(connection).await,
            None => Ok(()),
        };
        drop(checkout);

        match outcome {
            Ok(()) => {
                self.log
                    .info("Database schema verified/initialized successfully");
                Ok(())
            }
            Err(err) => {
                let message = match &err {
                    SchemaError::UnexpectedInitialization { .. } => {
                        "Unexpected error during database schema initialization"
                    }
                    _ => "Critical failure initializing the database schema",
                };
                self.log.critical(message, &err);
                Err(err)
            }
        }
    }

    async fn apply_stages<C>(&self, connection: &mut C) -> Result<(), SchemaError>
    where
        C: SchemaConnection,
    {
        for stage in SchemaStage::ALL {
            debug!(stage = %stage, "Executing schema stage");

            let outcome = AssertUnwindSafe(connection.execute_script(stage.sql()))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => self.log.info(&format!("Verified/created {stage}")),
                Ok(Err(StatementError::Database(source))) => {
                    return Err(SchemaError::SchemaInitialization { stage, source });
                }
                Ok(Err(StatementError::Unexpected(source))) => {
                    return Err(SchemaError::UnexpectedInitialization { stage, source });
                }
                Err(payload) => {
                    return Err(SchemaError::UnexpectedInitialization {
                        stage,
                        source: Box::new(StagePanic::from_payload(payload)),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Owns a borrowed connection and returns it to its provider when dropped,
/// including when the `initialize` future is cancelled mid-stage.
struct Checkout<'a, P: ConnectionProvider> {
    provider: &'a P,
    // Populated until drop.
    connection: Option<P::Connection>,
}

impl<P: ConnectionProvider> Drop for Checkout<'_, P> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.provider.release(connection);
        }
    }
}

impl Default for SchemaInitializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Ensure the `validacoes_gerais` schema exists, reporting through `tracing`.
pub async fn initialize_database<P>(provider: &P) -> Result<(), SchemaError>
where
    P: ConnectionProvider,
{
    SchemaInitializer::new().initialize(provider).await
}

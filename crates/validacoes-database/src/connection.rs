//! PostgreSQL connection pool management.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::Postgres;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info};

use validacoes_core::config::DatabaseConfig;
use validacoes_core::error::{AppError, ErrorKind};

use crate::provider::{ConnectionProvider, SchemaConnection, StatementError};

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            search_path = config.search_path.as_deref().unwrap_or("<server default>"),
            "Connecting to PostgreSQL"
        );

        let mut options = PgConnectOptions::from_str(&config.url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid database URL: {e}"),
                e,
            )
        })?;
        if let Some(search_path) = &config.search_path {
            options = options.options([("search_path", search_path.as_str())]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Return the underlying sqlx pool (consuming self).
    pub fn into_pool(self) -> PgPool {
        self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// A connection checked out of a [`DatabasePool`].
#[derive(Debug)]
pub struct PooledConnection {
    inner: PoolConnection<Postgres>,
}

#[async_trait]
impl SchemaConnection for PooledConnection {
    async fn execute_script(&mut self, sql: &str) -> Result<(), StatementError> {
        // A bare `&str` without arguments goes through the simple query
        // protocol, so several statements and `$$` bodies run in one call.
        sqlx::Executor::execute(&mut *self.inner, sql).await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for DatabasePool {
    type Connection = PooledConnection;

    async fn acquire(&self) -> Result<PooledConnection, AppError> {
        let inner = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to acquire database connection: {e}"),
                e,
            )
        })?;
        debug!(
            idle = self.pool.num_idle(),
            size = self.pool.size(),
            "Acquired pooled connection"
        );
        Ok(PooledConnection { inner })
    }

    fn release(&self, connection: PooledConnection) {
        // Dropping a `PoolConnection` hands it back to the pool.
        drop(connection);
        debug!("Released pooled connection");
    }
}

/// Mask the password portion of a database URL for safe logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}

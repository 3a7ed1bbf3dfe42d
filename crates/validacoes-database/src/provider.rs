//! Connection provider abstraction consumed by the schema initializer.
//!
//! The initializer never talks to a pool directly. It borrows one
//! connection through [`ConnectionProvider::acquire`], runs its scripts on
//! it, and hands it back through [`ConnectionProvider::release`].

use async_trait::async_trait;
use thiserror::Error;

use validacoes_core::error::AppError;

/// Failure reported by a connection while executing a script.
#[derive(Debug, Error)]
pub enum StatementError {
    /// The engine rejected the statement, or the connection broke mid-statement.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// Any failure that did not come from the database driver.
    #[error(transparent)]
    Unexpected(Box<dyn std::error::Error + Send + Sync>),
}

/// A connection able to run DDL scripts.
#[async_trait]
pub trait SchemaConnection: Send {
    /// Execute a script that may contain several `;`-separated statements.
    async fn execute_script(&mut self, sql: &str) -> Result<(), StatementError>;
}

/// Source of exclusive connections.
///
/// `release` is called exactly once for every connection returned by a
/// successful `acquire`. It is synchronous so that it can run from `Drop`
/// when the caller's future is cancelled.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Connection type handed out by this provider.
    type Connection: SchemaConnection + 'static;

    /// Borrow a connection. Fails with a `Database`-kind error when none can
    /// be produced.
    async fn acquire(&self) -> Result<Self::Connection, AppError>;

    /// Return a borrowed connection. Must not fail.
    fn release(&self, connection: Self::Connection);
}

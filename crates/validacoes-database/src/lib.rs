//! # validacoes-database
//!
//! PostgreSQL connection management and the idempotent bootstrap of the
//! `validacoes_gerais` schema: table, indices, the `updated_at` maintenance
//! function and its trigger.

pub mod connection;
pub mod provider;
pub mod schema;

pub use connection::DatabasePool;
pub use provider::{ConnectionProvider, SchemaConnection, StatementError};
pub use schema::{SchemaError, SchemaInitializer, SchemaReport, SchemaStage, initialize_database};

//! Read-back of the `validacoes_gerais` schema objects from the catalog.
//!
//! All lookups are scoped to `current_schema()`, i.e. the first schema of
//! the session `search_path`, which is where the unqualified DDL lands.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use validacoes_core::AppResult;
use validacoes_core::error::{AppError, ErrorKind};
use validacoes_entity::ValidationRecord;

use super::ddl::{INDEX_NAMES, TRIGGER_NAME, UPDATE_FUNCTION_NAME};

/// One column as reported by `information_schema.columns`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// SQL data type (e.g. `character varying`, `jsonb`).
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    pub is_nullable: bool,
    /// Default expression, if any.
    pub default_value: Option<String>,
}

/// One index as reported by `pg_indexes`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IndexInfo {
    /// Index name.
    pub name: String,
    /// Full `CREATE INDEX` definition.
    pub definition: String,
}

/// State of every object the initializer is responsible for.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    /// Schema the report was taken in.
    pub schema: String,
    /// Whether `validacoes_gerais` exists.
    pub table_exists: bool,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnInfo>,
    /// Indices on the table, primary key included.
    pub indexes: Vec<IndexInfo>,
    /// Whether `update_updated_at_column()` exists.
    pub function_exists: bool,
    /// Whether `trg_validacoes_gerais_updated_at` exists on the table.
    pub trigger_exists: bool,
}

impl SchemaReport {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Entity columns absent from the table.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        ValidationRecord::COLUMNS
            .into_iter()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    /// Lookup indices absent from the table.
    pub fn missing_indexes(&self) -> Vec<&'static str> {
        INDEX_NAMES
            .into_iter()
            .filter(|name| !self.indexes.iter().any(|i| i.name == *name))
            .collect()
    }

    /// Whether every object exists.
    pub fn is_complete(&self) -> bool {
        self.table_exists
            && self.missing_columns().is_empty()
            && self.missing_indexes().is_empty()
            && self.function_exists
            && self.trigger_exists
    }
}

/// Inspect the catalog for the objects created by the initializer.
pub async fn inspect_schema(pool: &PgPool) -> AppResult<SchemaReport> {
    let table = ValidationRecord::TABLE_NAME;

    let schema: String = sqlx::query_scalar("SELECT current_schema()::text")
        .fetch_one(pool)
        .await
        .map_err(inspect_error)?;

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_name = $1
         )",
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .map_err(inspect_error)?;

    let columns = sqlx::query_as::<_, ColumnInfo>(
        "SELECT column_name::text AS name,
                data_type::text AS data_type,
                (is_nullable = 'YES') AS is_nullable,
                column_default::text AS default_value
         FROM information_schema.columns
         WHERE table_schema = current_schema() AND table_name = $1
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(inspect_error)?;

    let indexes = sqlx::query_as::<_, IndexInfo>(
        "SELECT indexname::text AS name, indexdef AS definition
         FROM pg_indexes
         WHERE schemaname = current_schema() AND tablename = $1
         ORDER BY indexname",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(inspect_error)?;

    let function_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM pg_proc p
             JOIN pg_namespace n ON n.oid = p.pronamespace
             WHERE n.nspname = current_schema() AND p.proname = $1
         )",
    )
    .bind(UPDATE_FUNCTION_NAME)
    .fetch_one(pool)
    .await
    .map_err(inspect_error)?;

    let trigger_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM pg_trigger t
             JOIN pg_class c ON c.oid = t.tgrelid
             JOIN pg_namespace n ON n.oid = c.relnamespace
             WHERE n.nspname = current_schema()
               AND c.relname = $1
               AND t.tgname = $2
               AND NOT t.tgisinternal
         )",
    )
    .bind(table)
    .bind(TRIGGER_NAME)
    .fetch_one(pool)
    .await
    .map_err(inspect_error)?;

    debug!(
        schema = %schema,
        table_exists,
        columns = columns.len(),
        indexes = indexes.len(),
        function_exists,
        trigger_exists,
        "Inspected schema"
    );

    Ok(SchemaReport {
        schema,
        table_exists,
        columns,
        indexes,
        function_exists,
        trigger_exists,
    })
}

fn inspect_error(e: sqlx::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Database,
        format!("Failed to inspect schema: {e}"),
        e,
    )
}

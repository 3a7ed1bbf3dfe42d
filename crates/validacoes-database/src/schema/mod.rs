//! Schema bootstrap for the `validacoes_gerais` store.
//!
//! [`initialize_database`] applies four idempotent stages over one borrowed
//! connection: the table, its lookup indices, the `updated_at` maintenance
//! function and the trigger calling it. [`inspect_schema`] reads the
//! resulting objects back from the catalog.

pub mod ddl;
pub mod error;
pub mod initializer;
pub mod inspect;
pub mod log;

pub use ddl::SchemaStage;
pub use error::{SchemaError, StagePanic};
pub use initializer::{SchemaInitializer, initialize_database};
pub use inspect::{ColumnInfo, IndexInfo, SchemaReport, inspect_schema};
pub use log::{SchemaLog, TracingLog};

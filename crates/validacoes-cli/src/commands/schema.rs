//! Schema bootstrap and inspection commands.

use clap::{Args, Subcommand};
use tabled::Tabled;
use tracing::{debug, info};

use crate::output::{self, OutputFormat};
use validacoes_core::error::AppError;
use validacoes_database::schema::ddl::INDEX_NAMES;
use validacoes_database::schema::{SchemaReport, inspect_schema};
use validacoes_database::{DatabasePool, initialize_database};
use validacoes_entity::ValidationRecord;

/// Arguments for the schema command
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Schema subcommand
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// Schema subcommands
#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Create the table, indices, function and trigger if missing
    Init,
    /// Report which schema objects exist
    Status,
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Nullable")]
    nullable: &'static str,
    #[tabled(rename = "Default")]
    default: String,
}

#[derive(Tabled)]
struct IndexRow {
    #[tabled(rename = "Index")]
    name: String,
    #[tabled(rename = "Definition")]
    definition: String,
}

/// Execute schema commands
pub async fn execute(
    args: &SchemaArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    debug!(config = config_path, command = ?args.command, "Running schema command");
    let pool = super::create_db_pool(&config).await?;

    let result = match &args.command {
        SchemaCommand::Init => init(&pool, format).await,
        SchemaCommand::Status => status(&pool, format).await,
    };

    pool.close().await;
    result
}

async fn init(pool: &DatabasePool, format: OutputFormat) -> Result<(), AppError> {
    if format == OutputFormat::Table {
        println!("Initializing schema 'validacoes_gerais'...");
    }
    initialize_database(pool).await?;

    let report = inspect_schema(pool.pool()).await?;
    info!(
        schema = %report.schema,
        complete = report.is_complete(),
        "Schema initialized"
    );
    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            output::print_success("Schema initialized.");
            print_summary(&report);
        }
    }
    ensure_complete(&report)
}

async fn status(pool: &DatabasePool, format: OutputFormat) -> Result<(), AppError> {
    let report = inspect_schema(pool.pool()).await?;
    info!(
        schema = %report.schema,
        table_exists = report.table_exists,
        columns = report.columns.len(),
        indexes = report.indexes.len(),
        "Schema inspected"
    );

    match format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Table => {
            print_summary(&report);
            println!();
            let columns: Vec<ColumnRow> = report
                .columns
                .iter()
                .map(|c| ColumnRow {
                    name: c.name.clone(),
                    data_type: c.data_type.clone(),
                    nullable: output::yes_no(c.is_nullable),
                    default: c.default_value.clone().unwrap_or_default(),
                })
                .collect();
            output::print_table("Columns:", &columns);
            println!();
            let indexes: Vec<IndexRow> = report
                .indexes
                .iter()
                .map(|i| IndexRow {
                    name: i.name.clone(),
                    definition: i.definition.clone(),
                })
                .collect();
            output::print_table("Indexes:", &indexes);
        }
    }

    ensure_complete(&report)
}

fn print_summary(report: &SchemaReport) {
    let expected_columns = ValidationRecord::COLUMNS.len();
    let column_count = expected_columns - report.missing_columns().len();
    let index_count = INDEX_NAMES.len() - report.missing_indexes().len();

    output::print_kv("Schema", &report.schema);
    output::print_kv("Table", output::yes_no(report.table_exists));
    output::print_kv(
        "Columns",
        &format!("{}/{}", column_count, expected_columns),
    );
    output::print_kv("Lookup indexes", &format!("{}/{}", index_count, INDEX_NAMES.len()));
    output::print_kv("Update function", output::yes_no(report.function_exists));
    output::print_kv("Update trigger", output::yes_no(report.trigger_exists));

    let missing_columns = report.missing_columns();
    if report.table_exists && !missing_columns.is_empty() {
        output::print_warning(&format!("Missing columns: {}", missing_columns.join(", ")));
    }
    let missing_indexes = report.missing_indexes();
    if report.table_exists && !missing_indexes.is_empty() {
        output::print_warning(&format!("Missing indexes: {}", missing_indexes.join(", ")));
    }
}

fn ensure_complete(report: &SchemaReport) -> Result<(), AppError> {
    if report.is_complete() {
        Ok(())
    } else {
        output::print_error("Schema is incomplete; run `validacoes-cli schema init`.");
        Err(AppError::validation(format!(
            "schema '{}' is missing objects of 'validacoes_gerais'",
            report.schema
        )))
    }
}

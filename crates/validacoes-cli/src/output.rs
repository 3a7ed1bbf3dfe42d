//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use validacoes_core::error::AppError;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows as a table. Callers handle JSON themselves so that one
/// document covers the whole command output.
pub fn print_table<T: Tabled>(title: &str, rows: &[T]) {
    println!("{}", title);
    if rows.is_empty() {
        println!("  (none)");
    } else {
        println!("{}", Table::new(rows));
    }
}

/// Print a serializable value in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(
    item: &T,
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
            Ok(())
        }
        OutputFormat::Json => print_json(item),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(item: &T) -> Result<(), AppError> {
    println!("{}", to_pretty_json(item)?);
    Ok(())
}

fn to_pretty_json<T: Serialize>(item: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(item)?)
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Render a boolean as `yes`/`no`
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

//! Validacoes bootstrap
//!
//! Startup entry point: loads configuration, connects to PostgreSQL and makes
//! sure the `validacoes_gerais` schema exists before dependent services run.

use tracing_subscriber::{EnvFilter, fmt};

use validacoes_core::config::AppConfig;
use validacoes_core::error::AppError;
use validacoes_database::connection::mask_password;
use validacoes_database::schema::inspect_schema;
use validacoes_database::{DatabasePool, SchemaInitializer};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Bootstrap failed: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("VALIDACOES_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("VALIDACOES_ENV").unwrap_or_else(|_| "development".to_string());

    let overlay = format!("config/{}.toml", env);
    AppConfig::load_with_overlay(&config_path, Some(&overlay))
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting validacoes bootstrap v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        "Connecting to database at {}...",
        mask_password(&config.database.url)
    );
    let pool = DatabasePool::connect(&config.database).await?;

    let result = bootstrap(&pool, &config).await;
    pool.close().await;
    result?;

    tracing::info!("Bootstrap complete");
    Ok(())
}

async fn bootstrap(pool: &DatabasePool, config: &AppConfig) -> Result<(), AppError> {
    if config.schema.initialize_on_startup {
        SchemaInitializer::new().initialize(pool).await?;
    } else {
        tracing::info!("Schema initialization disabled");
    }

    if config.schema.verify_after_initialize {
        let report = inspect_schema(pool.pool()).await?;
        if !report.is_complete() {
            tracing::error!(
                missing_columns = ?report.missing_columns(),
                missing_indexes = ?report.missing_indexes(),
                function_exists = report.function_exists,
                trigger_exists = report.trigger_exists,
                "Schema '{}' is incomplete",
                report.schema
            );
            return Err(AppError::validation(format!(
                "schema '{}' is missing objects of 'validacoes_gerais'",
                report.schema
            )));
        }
        tracing::info!(
            columns = report.columns.len(),
            indexes = report.indexes.len(),
            "Schema '{}' verified",
            report.schema
        );
    }

    if !pool.health_check().await? {
        return Err(AppError::service_unavailable("Database health check failed"));
    }

    Ok(())
}

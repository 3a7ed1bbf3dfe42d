//! Shared test helpers for database integration tests.

use sqlx::PgPool;
use uuid::Uuid;

use validacoes_core::config::AppConfig;
use validacoes_database::DatabasePool;

const TEST_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_config.toml");

/// A pool whose `search_path` points at a freshly created, empty schema.
pub struct TestDb {
    /// Pool used by the code under test
    pub pool: DatabasePool,
    /// Name of the throwaway schema
    pub schema: String,
    admin: PgPool,
}

impl TestDb {
    /// Create a new empty schema and a pool bound to it
    pub async fn new() -> Self {
        let config = AppConfig::load(TEST_CONFIG).expect("Failed to load test config");

        let admin = PgPool::connect(&config.database.url)
            .await
            .expect("Failed to connect to test database");

        let schema = format!("validacoes_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let mut database = config.database.clone();
        database.search_path = Some(schema.clone());
        let pool = DatabasePool::connect(&database)
            .await
            .expect("Failed to connect with test search_path");

        Self {
            pool,
            schema,
            admin,
        }
    }

    /// Underlying sqlx pool
    pub fn pg(&self) -> &PgPool {
        self.pool.pool()
    }

    /// Drop the schema and close both pools
    pub async fn cleanup(self) {
        self.pool.close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
            .execute(&self.admin)
            .await;
        self.admin.close().await;
    }
}

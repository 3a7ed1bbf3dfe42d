//! DDL for the `validacoes_gerais` store and the stages that apply it.

use std::fmt;

/// Creates the table when absent.
pub const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS validacoes_gerais (
    id SERIAL PRIMARY KEY,
    regra_negocio VARCHAR(255) NOT NULL,
    regra_negocio_descricao TEXT,
    regra_negocio_parametros JSONB,
    usuario_criacao VARCHAR(255),
    usuario_atualizacao VARCHAR(255),
    dado_original VARCHAR(255) NOT NULL,
    dado_normalizado VARCHAR(255) NOT NULL,
    mensagem TEXT,
    origem_validacao VARCHAR(100),
    tipo_validacao VARCHAR(100) NOT NULL,
    is_valid BOOLEAN NOT NULL DEFAULT FALSE,
    data_validacao TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP,
    app_name VARCHAR(100) NOT NULL,
    client_identifier VARCHAR(255),
    regra_negocio_codigo VARCHAR(255),
    regra_negocio_descricao_detalhada TEXT,
    validation_details JSONB DEFAULT '{}',
    is_deleted BOOLEAN DEFAULT FALSE,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Lookup indices. `DESC` belongs inside the column list; PostgreSQL rejects
/// it between the index name and `ON`.
pub const CREATE_INDEXES_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_validacoes_gerais_tipo_validacao ON validacoes_gerais (tipo_validacao);
CREATE INDEX IF NOT EXISTS idx_validacoes_gerais_app_name ON validacoes_gerais (app_name);
CREATE INDEX IF NOT EXISTS idx_validacoes_gerais_data_validacao ON validacoes_gerais (data_validacao DESC);
CREATE INDEX IF NOT EXISTS idx_validacoes_gerais_dado_original_tipo_app ON validacoes_gerais (dado_original, tipo_validacao, app_name);
CREATE INDEX IF NOT EXISTS idx_validacoes_gerais_dado_normalizado_tipo_app ON validacoes_gerais (dado_normalizado, tipo_validacao, app_name);
"#;

/// Trigger function refreshing `updated_at` on every row update.
pub const CREATE_UPDATE_FUNCTION_SQL: &str = r#"
CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
  NEW.updated_at = NOW();
  RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#;

/// Recreates the trigger so definition changes land on re-runs.
pub const CREATE_TRIGGER_SQL: &str = r#"
DROP TRIGGER IF EXISTS trg_validacoes_gerais_updated_at ON validacoes_gerais;
CREATE TRIGGER trg_validacoes_gerais_updated_at
BEFORE UPDATE ON validacoes_gerais
FOR EACH ROW EXECUTE FUNCTION update_updated_at_column();
"#;

/// Names of the indices created by [`CREATE_INDEXES_SQL`].
pub const INDEX_NAMES: [&str; 5] = [
    "idx_validacoes_gerais_tipo_validacao",
    "idx_validacoes_gerais_app_name",
    "idx_validacoes_gerais_data_validacao",
    "idx_validacoes_gerais_dado_original_tipo_app",
    "idx_validacoes_gerais_dado_normalizado_tipo_app",
];

/// Name of the function created by [`CREATE_UPDATE_FUNCTION_SQL`].
pub const UPDATE_FUNCTION_NAME: &str = "update_updated_at_column";

/// Name of the trigger created by [`CREATE_TRIGGER_SQL`].
pub const TRIGGER_NAME: &str = "trg_validacoes_gerais_updated_at";

/// One step of the bootstrap. Indices and the trigger reference the table,
/// and the trigger references the function, so the order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaStage {
    /// `validacoes_gerais` itself.
    Table,
    /// The five lookup indices.
    Indexes,
    /// `update_updated_at_column()`.
    UpdateFunction,
    /// `trg_validacoes_gerais_updated_at`.
    Trigger,
}

impl SchemaStage {
    /// All stages in execution order.
    pub const ALL: [SchemaStage; 4] = [
        SchemaStage::Table,
        SchemaStage::Indexes,
        SchemaStage::UpdateFunction,
        SchemaStage::Trigger,
    ];

    /// The script executed for this stage.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Table => CREATE_TABLE_SQL,
            Self::Indexes => CREATE_INDEXES_SQL,
            Self::UpdateFunction => CREATE_UPDATE_FUNCTION_SQL,
            Self::Trigger => CREATE_TRIGGER_SQL,
        }
    }

    /// Stage label used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table 'validacoes_gerais'",
            Self::Indexes => "indices on 'validacoes_gerais'",
            Self::UpdateFunction => "function 'update_updated_at_column'",
            Self::Trigger => "trigger 'trg_validacoes_gerais_updated_at'",
        }
    }
}

impl fmt::Display for SchemaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validacoes_entity::ValidationRecord;

    #[test]
    fn test_table_declares_every_entity_column() {
        for column in ValidationRecord::COLUMNS {
            let declared = CREATE_TABLE_SQL
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{column} ")));
            assert!(declared, "column {column} missing from CREATE TABLE");
        }
    }

    #[test]
    fn test_required_columns_are_not_null() {
        for column in ValidationRecord::REQUIRED_COLUMNS {
            let line = CREATE_TABLE_SQL
                .lines()
                .map(str::trim)
                .find(|line| line.starts_with(&format!("{column} ")))
                .unwrap_or_else(|| panic!("column {column} not declared"));
            assert!(
                line.contains("NOT NULL") || line.contains("PRIMARY KEY"),
                "{column} should be NOT NULL: {line}"
            );
        }
    }

    #[test]
    fn test_every_statement_is_idempotent() {
        assert!(CREATE_TABLE_SQL.contains("CREATE TABLE IF NOT EXISTS validacoes_gerais"));

        let index_statements: Vec<&str> = CREATE_INDEXES_SQL
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert_eq!(index_statements.len(), INDEX_NAMES.len());
        for (statement, name) in index_statements.iter().zip(INDEX_NAMES) {
            assert!(
                statement.starts_with(&format!("CREATE INDEX IF NOT EXISTS {name} ON validacoes_gerais (")),
                "unexpected index statement: {statement}"
            );
        }

        assert!(CREATE_UPDATE_FUNCTION_SQL.contains("CREATE OR REPLACE FUNCTION update_updated_at_column()"));
    }

    #[test]
    fn test_descending_index_orders_inside_column_list() {
        assert!(CREATE_INDEXES_SQL.contains("ON validacoes_gerais (data_validacao DESC);"));
        assert!(!CREATE_INDEXES_SQL.contains("DESC ON"));
    }

    #[test]
    fn test_trigger_dropped_before_creation() {
        let drop = CREATE_TRIGGER_SQL
            .find(&format!("DROP TRIGGER IF EXISTS {TRIGGER_NAME} ON validacoes_gerais"))
            .expect("drop statement");
        let create = CREATE_TRIGGER_SQL
            .find(&format!("CREATE TRIGGER {TRIGGER_NAME}"))
            .expect("create statement");
        assert!(drop < create);
        assert!(CREATE_TRIGGER_SQL.contains("BEFORE UPDATE ON validacoes_gerais"));
        assert!(CREATE_TRIGGER_SQL.contains(&format!("EXECUTE FUNCTION {UPDATE_FUNCTION_NAME}()")));
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(
            SchemaStage::ALL,
            [
                SchemaStage::Table,
                SchemaStage::Indexes,
                SchemaStage::UpdateFunction,
                SchemaStage::Trigger,
            ]
        );
        assert_eq!(SchemaStage::Indexes.sql(), CREATE_INDEXES_SQL);
        assert_eq!(SchemaStage::Trigger.to_string(), "trigger 'trg_validacoes_gerais_updated_at'");
    }
}

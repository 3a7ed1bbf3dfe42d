//! Validation record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One outcome of a business-rule validation, as stored in `validacoes_gerais`.
///
/// Rows are written by the applications that run validations. Deletion is
/// logical through `is_deleted`; rows are never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ValidationRecord {
    /// Auto-increment primary key.
    pub id: i32,
    /// Business rule name.
    pub regra_negocio: String,
    /// Short rule description.
    pub regra_negocio_descricao: Option<String>,
    /// Parameters the rule was evaluated with.
    pub regra_negocio_parametros: Option<serde_json::Value>,
    /// Actor that created the row.
    pub usuario_criacao: Option<String>,
    /// Actor that last updated the row.
    pub usuario_atualizacao: Option<String>,
    /// Value as received.
    pub dado_original: String,
    /// Value after normalization.
    pub dado_normalizado: String,
    /// Message produced by the validation.
    pub mensagem: Option<String>,
    /// Where the validation was triggered from.
    pub origem_validacao: Option<String>,
    /// Validation type (e.g. `"cpf"`, `"email"`).
    pub tipo_validacao: String,
    /// Outcome flag.
    pub is_valid: bool,
    /// When the validation ran.
    pub data_validacao: Option<DateTime<Utc>>,
    /// Owning application.
    pub app_name: String,
    /// Caller identity.
    pub client_identifier: Option<String>,
    /// Rule code.
    pub regra_negocio_codigo: Option<String>,
    /// Extended rule description.
    pub regra_negocio_descricao_detalhada: Option<String>,
    /// Arbitrary extra detail, `{}` when not provided.
    pub validation_details: Option<serde_json::Value>,
    /// Soft-delete flag.
    pub is_deleted: Option<bool>,
    /// Insertion time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, maintained by `trg_validacoes_gerais_updated_at`.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ValidationRecord {
    /// Name of the backing table.
    pub const TABLE_NAME: &'static str = "validacoes_gerais";

    /// Every column, in declaration order.
    pub const COLUMNS: [&'static str; 21] = [
        "id",
        "regra_negocio",
        "regra_negocio_descricao",
        "regra_negocio_parametros",
        "usuario_criacao",
        "usuario_atualizacao",
        "dado_original",
        "dado_normalizado",
        "mensagem",
        "origem_validacao",
        "tipo_validacao",
        "is_valid",
        "data_validacao",
        "app_name",
        "client_identifier",
        "regra_negocio_codigo",
        "regra_negocio_descricao_detalhada",
        "validation_details",
        "is_deleted",
        "created_at",
        "updated_at",
    ];

    /// Columns declared `NOT NULL` (the primary key included).
    pub const REQUIRED_COLUMNS: [&'static str; 7] = [
        "id",
        "regra_negocio",
        "dado_original",
        "dado_normalizado",
        "tipo_validacao",
        "is_valid",
        "app_name",
    ];

    /// Whether the row is still logically present.
    pub fn is_active(&self) -> bool {
        !self.is_deleted.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ValidationRecord {
        ValidationRecord {
            id: 1,
            regra_negocio: "cpf_valido".to_string(),
            regra_negocio_descricao: None,
            regra_negocio_parametros: Some(serde_json::json!({ "strict": true })),
            usuario_criacao: None,
            usuario_atualizacao: None,
            dado_original: "123.456.789-09".to_string(),
            dado_normalizado: "12345678909".to_string(),
            mensagem: None,
            origem_validacao: None,
            tipo_validacao: "cpf".to_string(),
            is_valid: true,
            data_validacao: None,
            app_name: "cadastro".to_string(),
            client_identifier: None,
            regra_negocio_codigo: None,
            regra_negocio_descricao_detalhada: None,
            validation_details: Some(serde_json::json!({})),
            is_deleted: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_required_columns_are_known_columns() {
        for column in ValidationRecord::REQUIRED_COLUMNS {
            assert!(
                ValidationRecord::COLUMNS.contains(&column),
                "{column} is not a column of {}",
                ValidationRecord::TABLE_NAME
            );
        }
    }

    #[test]
    fn test_is_active_follows_soft_delete_flag() {
        let mut row = record();
        assert!(row.is_active());

        row.is_deleted = Some(false);
        assert!(row.is_active());

        row.is_deleted = Some(true);
        assert!(!row.is_active());
    }

    #[test]
    fn test_serializes_with_column_names() {
        let value = serde_json::to_value(record()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), ValidationRecord::COLUMNS.len());
        for column in ValidationRecord::COLUMNS {
            assert!(object.contains_key(column), "missing key {column}");
        }
    }
}

//! Errors raised while bootstrapping the schema.

use std::any::Any;

use thiserror::Error;

use validacoes_core::error::{AppError, ErrorKind};

use super::ddl::SchemaStage;

/// Why [`initialize_database`](super::initialize_database) failed.
///
/// No stage is retried: the first failure stops the remaining stages.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The provider could not produce a connection. No DDL was attempted.
    #[error("could not acquire a database connection: {0}")]
    Connectivity(#[source] AppError),

    /// The database rejected a stage (syntax, privileges, dropped connection).
    #[error("schema initialization failed while creating {stage}: {source}")]
    SchemaInitialization {
        /// Stage that failed.
        stage: SchemaStage,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A stage failed for a reason that did not come from the database.
    #[error("unexpected error while creating {stage}: {source}")]
    UnexpectedInitialization {
        /// Stage that failed.
        stage: SchemaStage,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SchemaError {
    /// Stage that was running when the error occurred, if any.
    pub fn stage(&self) -> Option<SchemaStage> {
        match self {
            Self::Connectivity(_) => None,
            Self::SchemaInitialization { stage, .. }
            | Self::UnexpectedInitialization { stage, .. } => Some(*stage),
        }
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        let kind = match &err {
            SchemaError::Connectivity(_) | SchemaError::SchemaInitialization { .. } => {
                ErrorKind::Database
            }
            SchemaError::UnexpectedInitialization { .. } => ErrorKind::Internal,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

/// A panic caught while a stage was running.
#[derive(Debug, Error)]
#[error("stage panicked: {message}")]
pub struct StagePanic {
    /// Panic payload rendered as text.
    pub message: String,
}

impl StagePanic {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

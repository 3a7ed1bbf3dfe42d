//! # validacoes-entity
//!
//! Entity model for the general validations store. `ValidationRecord` maps
//! one row of `validacoes_gerais`; the constants next to it are the single
//! source of truth for the table and column names the schema layer checks
//! against.

pub mod validation;

pub use validation::ValidationRecord;

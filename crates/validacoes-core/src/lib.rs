//! # validacoes-core
//!
//! Core crate for the general validations store. Contains the configuration
//! schemas and the unified error system shared by the database layer, the
//! startup binary and the CLI.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;

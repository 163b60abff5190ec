//! Error types for the ambient parts of the pipeline.
//!
//! The three inference stages never fail: garbage text degrades to an empty
//! extraction, dangling relationships are dropped and diagram defects are
//! repaired or annotated. The errors below cover configuration loading and
//! the optional external concept source only.

use thiserror::Error;

/// Configuration could not be loaded from file or environment
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure reported by an external [`ConceptSource`](crate::pipeline::ConceptSource)
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Concept source '{source_name}' is unavailable: {message}")]
    Unavailable { source_name: String, message: String },

    #[error("Concept source '{source_name}' returned a malformed response: {message}")]
    MalformedResponse { source_name: String, message: String },

    #[error("Concept source '{source_name}' timed out after {seconds}s")]
    Timeout { source_name: String, seconds: u64 },
}

/// Structural problem found in, or raised by an edit to, a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Table '{table}' column '{column}' references missing table '{referenced}'")]
    DanglingReference {
        table: String,
        column: String,
        referenced: String,
    },

    #[error("Circular foreign key dependency between: {}", tables.join(", "))]
    CircularDependency { tables: Vec<String> },

    #[error("Table '{0}' does not exist")]
    UnknownTable(String),
}

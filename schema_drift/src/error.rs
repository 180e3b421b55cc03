//! Error types for schema_drift

use thiserror::Error;

/// Result type for schema_drift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema_drift
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A column's normalized type name has no taxonomy entry. Fatal for the
    /// column: guessing a type would silently change the generated DDL.
    #[error("Unknown column type `{type_name}` for column `{column}`")]
    UnknownColumnType { column: String, type_name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Convert TOML deserialization errors to schema_drift errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}

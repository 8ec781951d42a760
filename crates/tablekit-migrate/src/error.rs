//! Error types for the migration system.

use std::path::PathBuf;

use tablekit_core::SchemaError;

/// Errors that can occur while running or scaffolding migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A migration produced an invalid table definition.
    #[error("Migration '{migration}' failed: {source}")]
    Schema {
        /// The migration that failed.
        migration: String,
        /// The builder error.
        #[source]
        source: SchemaError,
    },

    /// Two migrations were registered under the same name.
    #[error("Migration '{0}' is already registered")]
    DuplicateMigration(String),

    /// A statement sink rejected a statement.
    #[error("Failed to apply migration '{migration}': {message}")]
    Sink {
        /// The migration whose statement was rejected.
        migration: String,
        /// Error message reported by the sink.
        message: String,
    },

    /// A seeder failed.
    #[error("Seeder failed: {0}")]
    Seeder(String),

    /// A scaffold command was given no name.
    #[error("A name is required to create a {0}")]
    MissingName(&'static str),

    /// Refusing to overwrite an existing file.
    #[error("File already exists: {0}")]
    FileExists(PathBuf),

    /// IO error (reading/writing scaffolded files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    /// Wraps a builder error with the migration it came from.
    pub fn schema(migration: impl Into<String>, source: SchemaError) -> Self {
        Self::Schema {
            migration: migration.into(),
            source,
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

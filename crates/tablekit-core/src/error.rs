//! Error types for the table builder.

/// Errors raised while building or exporting a table definition.
///
/// These are usage errors: they surface synchronously to the code that
/// drives the builder, never to the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A modifier was called before any column or constraint was added.
    #[error("`{modifier}` called before any column or constraint was defined")]
    EmptySequence {
        /// The modifier that was called.
        modifier: &'static str,
    },

    /// A foreign key modifier was called while the last fragment is a column.
    #[error("`{modifier}` must follow `foreign`, but the last fragment is column `{found}`")]
    MisplacedForeignKeyModifier {
        /// The modifier that was called.
        modifier: &'static str,
        /// Name of the column the modifier would have touched.
        found: String,
    },

    /// Foreign key modifiers were called out of order.
    #[error("`{modifier}` called out of order on foreign key `{column}`, expected `{expected}`")]
    ForeignKeyOutOfOrder {
        /// The modifier that was called.
        modifier: &'static str,
        /// The call the foreign key is waiting for.
        expected: &'static str,
        /// Local column of the foreign key.
        column: String,
    },

    /// A column modifier was called while the last fragment is a foreign key.
    #[error("`{modifier}` applies to columns, but the last fragment is foreign key `{column}`")]
    NotAColumn {
        /// The modifier that was called.
        modifier: &'static str,
        /// Local column of the foreign key.
        column: String,
    },

    /// A foreign key was left without its referenced column or table.
    #[error("foreign key `{column}` is incomplete, expected `{expected}`")]
    IncompleteForeignKey {
        /// Local column of the foreign key.
        column: String,
        /// The call the foreign key is waiting for.
        expected: &'static str,
    },

    /// The table name was set to an empty string.
    #[error("table name cannot be empty")]
    EmptyTableName,

    /// A statement was requested before a table name was set.
    #[error("no table name set, call `set_table` first")]
    MissingTableName,

    /// An identifier was rejected by strict mode.
    #[error("invalid identifier `{identifier}`: {reason}")]
    InvalidIdentifier {
        /// The rejected identifier.
        identifier: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

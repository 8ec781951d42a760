//! # tablekit-core
//!
//! A fluent `CREATE TABLE` builder.
//!
//! Each call either appends a column or constraint fragment, or modifies the
//! fragment appended last. [`Table::export`] turns the fragments into a
//! single statement for the selected [`Dialect`] and resets the builder for
//! the next table.
//!
//! ```rust
//! use tablekit_core::{Dialect, Table};
//!
//! let mut table = Table::for_driver("pgsql");
//! table.set_table("users")?;
//! table.id_default()?;
//! table.string("email")?.unique()?;
//! table.integer("age")?.default(18)?;
//! table.timestamps()?;
//!
//! assert_eq!(table.dialect(), Dialect::Postgres);
//! assert_eq!(
//!     table.export()?,
//!     "CREATE TABLE IF NOT EXISTS users (\
//!      id SERIAL NOT NULL PRIMARY KEY, \
//!      email VARCHAR(255) NOT NULL UNIQUE, \
//!      age bigint NOT NULL DEFAULT 18, \
//!      create_at timestamp without time zone NOT NULL DEFAULT NOW(), \
//!      update_at timestamp without time zone NOT NULL DEFAULT NOW());"
//! );
//! # Ok::<(), tablekit_core::SchemaError>(())
//! ```
//!
//! Modifiers called in the wrong place are rejected instead of producing
//! broken SQL:
//!
//! ```rust
//! use tablekit_core::{Dialect, SchemaError, Table};
//!
//! let mut table = Table::new(Dialect::Generic);
//! assert!(matches!(table.nullable(), Err(SchemaError::EmptySequence { .. })));
//!
//! table.string("user_id")?;
//! assert!(matches!(
//!     table.references("id"),
//!     Err(SchemaError::MisplacedForeignKeyModifier { .. })
//! ));
//! # Ok::<(), tablekit_core::SchemaError>(())
//! ```

pub mod dialect;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod table;

pub use dialect::Dialect;
pub use error::{Result, SchemaError};
pub use fragment::{Column, ColumnKind, DefaultValue, ForeignKey, ForeignKeyStage, Fragment};
pub use table::Table;

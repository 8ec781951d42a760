//! Ordered schema migrations built on `tablekit-core`.
//!
//! A migration is a pair of functions that each drive a fresh
//! [`tablekit_core::Table`] and return the one statement it rendered.
//!
//! # Architecture
//!
//! - **Set** - Named migrations; names sort in creation order
//! - **Migrator** - Renders a set forward (ascending) or backward
//!   (descending) and hands each statement to a sink
//! - **Sink** - Where statements go; executing them is up to the application
//! - **Scaffold** - Generates migration, model and seeder skeletons
//! - **Console** - The `tablekit` command line
//!
//! # Example
//!
//! ```rust
//! use tablekit_core::{Dialect, Table};
//! use tablekit_migrate::prelude::*;
//!
//! struct CreateUsers;
//!
//! impl Migration for CreateUsers {
//!     fn up(&self, table: &mut Table) -> tablekit_core::Result<String> {
//!         table.set_table("users")?;
//!         table.id_default()?;
//!         table.string("email")?.unique()?;
//!         table.export()
//!     }
//!
//!     fn down(&self, table: &mut Table) -> tablekit_core::Result<String> {
//!         table.set_table("users")?;
//!         table.drop_statement()
//!     }
//! }
//!
//! let mut set = MigrationSet::new();
//! set.register("m1700000000_create_users", CreateUsers)?;
//!
//! let mut sink = CollectSink::new();
//! Migrator::new(&set, Dialect::Postgres).migrate(&mut sink)?;
//! assert_eq!(
//!     sink.sql(),
//!     ["CREATE TABLE IF NOT EXISTS users (id SERIAL NOT NULL PRIMARY KEY, \
//!       email VARCHAR(255) NOT NULL UNIQUE);"]
//! );
//! # Ok::<(), tablekit_migrate::error::MigrateError>(())
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Scaffold a migration
//! tablekit make migration create_users_table
//!
//! # Print forward statements, then seed
//! tablekit migrate --seed
//!
//! # Print backward statements
//! tablekit rollback
//! ```

use tablekit_core::Table;

pub mod console;
pub mod error;
pub mod migrator;
pub mod scaffold;
pub mod set;
pub mod sink;

pub use migrator::{MigrationReport, Migrator, Seeder};
pub use set::{Direction, MigrationSet};
pub use sink::{CollectSink, PrintSink, StatementSink};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::Migration;
    pub use crate::error::{MigrateError, Result};
    pub use crate::migrator::{MigrationReport, Migrator, Seeder};
    pub use crate::scaffold::{Scaffold, ScaffoldKind};
    pub use crate::set::{Direction, MigrationSet};
    pub use crate::sink::{CollectSink, PrintSink, StatementSink};
}

/// A schema change with a forward and a backward statement.
///
/// Each method receives a builder nobody else has touched and returns
/// exactly one statement.
pub trait Migration {
    /// Renders the forward statement.
    ///
    /// # Errors
    ///
    /// Returns the builder error that stopped rendering.
    fn up(&self, table: &mut Table) -> tablekit_core::Result<String>;

    /// Renders the backward statement.
    ///
    /// # Errors
    ///
    /// Returns the builder error that stopped rendering.
    fn down(&self, table: &mut Table) -> tablekit_core::Result<String>;
}

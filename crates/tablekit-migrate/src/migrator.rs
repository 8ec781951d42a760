//! Migration runner.
//!
//! This module renders migrations with a fresh [`Table`] per migration and
//! hands every statement to a [`StatementSink`].

use std::time::{Duration, Instant};

use serde::Serialize;
use tablekit_core::{Dialect, Table};
use tracing::{debug, info};

use crate::error::{MigrateError, Result};
use crate::set::{Direction, MigrationSet};
use crate::sink::StatementSink;

/// Populates tables after a forward run.
pub trait Seeder {
    /// Emits the seeding statements.
    ///
    /// # Errors
    ///
    /// Any error aborts seeding.
    fn run(&self, dialect: Dialect, sink: &mut dyn StatementSink) -> anyhow::Result<()>;
}

/// Outcome of one migration in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Migration name.
    pub name: String,
    /// Which half ran.
    pub direction: Direction,
    /// The rendered statement.
    pub sql: String,
    /// Time spent rendering and applying.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(millis(*elapsed))
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Runs a [`MigrationSet`] for one dialect.
#[derive(Debug)]
pub struct Migrator<'a> {
    set: &'a MigrationSet,
    dialect: Dialect,
    strict: bool,
}

impl<'a> Migrator<'a> {
    /// Creates a runner that builds permissive tables.
    #[must_use]
    pub const fn new(set: &'a MigrationSet, dialect: Dialect) -> Self {
        Self {
            set,
            dialect,
            strict: false,
        }
    }

    /// Validates identifiers in every migration.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Applies every migration in ascending order.
    ///
    /// # Errors
    ///
    /// Stops at the first migration that fails to render or apply.
    pub fn migrate(&self, sink: &mut dyn StatementSink) -> Result<Vec<MigrationReport>> {
        self.run(Direction::Up, sink)
    }

    /// Reverts every migration in descending order.
    ///
    /// # Errors
    ///
    /// Stops at the first migration that fails to render or apply.
    pub fn rollback(&self, sink: &mut dyn StatementSink) -> Result<Vec<MigrationReport>> {
        self.run(Direction::Down, sink)
    }

    /// Reverts everything, then applies everything again.
    ///
    /// # Errors
    ///
    /// Stops at the first migration that fails to render or apply.
    pub fn refresh(&self, sink: &mut dyn StatementSink) -> Result<Vec<MigrationReport>> {
        let mut reports = self.rollback(sink)?;
        reports.extend(self.migrate(sink)?);
        Ok(reports)
    }

    /// Runs a seeder and returns how long it took.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Seeder`] if the seeder fails.
    pub fn seed(&self, seeder: &dyn Seeder, sink: &mut dyn StatementSink) -> Result<Duration> {
        let started = Instant::now();
        seeder
            .run(self.dialect, sink)
            .map_err(|e| MigrateError::Seeder(format!("{e:#}")))?;
        let elapsed = started.elapsed();
        info!(elapsed_ms = millis(elapsed), "Seeded");
        Ok(elapsed)
    }

    /// Renders every migration in `direction` without applying anything.
    ///
    /// # Errors
    ///
    /// Returns the first rendering failure.
    pub fn plan(&self, direction: Direction) -> Result<Vec<MigrationReport>> {
        self.set
            .ordered(direction)
            .into_iter()
            .map(|(name, migration)| {
                let started = Instant::now();
                let sql = self.render(name, migration, direction)?;
                Ok(MigrationReport {
                    name: name.to_string(),
                    direction,
                    sql,
                    elapsed: started.elapsed(),
                })
            })
            .collect()
    }

    fn run(
        &self,
        direction: Direction,
        sink: &mut dyn StatementSink,
    ) -> Result<Vec<MigrationReport>> {
        info!(
            direction = %direction,
            dialect = %self.dialect,
            count = self.set.len(),
            "Running migrations"
        );

        let mut reports = Vec::with_capacity(self.set.len());
        for (name, migration) in self.set.ordered(direction) {
            let started = Instant::now();
            let sql = self.render(name, migration, direction)?;

            debug!(migration = name, sql = %sql, "Applying statement");
            sink.apply(name, &sql).map_err(|e| MigrateError::Sink {
                migration: name.to_string(),
                message: format!("{e:#}"),
            })?;

            let elapsed = started.elapsed();
            match direction {
                Direction::Up => info!(elapsed_ms = millis(elapsed), "{name} migrated"),
                Direction::Down => info!(elapsed_ms = millis(elapsed), "{name} rolled back"),
            }

            reports.push(MigrationReport {
                name: name.to_string(),
                direction,
                sql,
                elapsed,
            });
        }

        Ok(reports)
    }

    fn render(
        &self,
        name: &str,
        migration: &dyn crate::Migration,
        direction: Direction,
    ) -> Result<String> {
        let mut table = if self.strict {
            Table::strict(self.dialect)
        } else {
            Table::new(self.dialect)
        };

        let rendered = match direction {
            Direction::Up => migration.up(&mut table),
            Direction::Down => migration.down(&mut table),
        };
        rendered.map_err(|e| MigrateError::schema(name, e))
    }
}

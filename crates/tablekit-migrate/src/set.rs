//! Named, ordered migration registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::Migration;
use crate::error::{MigrateError, Result};

/// Which half of a migration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply forward (`up`).
    Up,
    /// Revert (`down`).
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Migrations keyed by name.
///
/// Names are expected to start with a creation timestamp so that sorting by
/// name gives creation order. Forward runs walk the set ascending, backward
/// runs descending.
#[derive(Default)]
pub struct MigrationSet {
    migrations: BTreeMap<String, Box<dyn Migration>>,
}

impl MigrationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a migration under a name.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::DuplicateMigration`] if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        migration: impl Migration + 'static,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.migrations.contains_key(&name) {
            return Err(MigrateError::DuplicateMigration(name));
        }
        self.migrations.insert(name, Box::new(migration));
        Ok(self)
    }

    /// Returns the number of registered migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns whether no migration is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Returns the names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.migrations.keys().map(String::as_str).collect()
    }

    /// Returns the migrations in the order a run in `direction` visits them.
    #[must_use]
    pub fn ordered(&self, direction: Direction) -> Vec<(&str, &dyn Migration)> {
        let iter = self
            .migrations
            .iter()
            .map(|(name, m)| (name.as_str(), m.as_ref()));
        match direction {
            Direction::Up => iter.collect(),
            Direction::Down => iter.rev().collect(),
        }
    }
}

impl fmt::Debug for MigrationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationSet")
            .field("migrations", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tablekit_core::Table;

    use super::*;

    struct Noop;

    impl Migration for Noop {
        fn up(&self, table: &mut Table) -> tablekit_core::Result<String> {
            table.export()
        }

        fn down(&self, table: &mut Table) -> tablekit_core::Result<String> {
            table.drop_statement()
        }
    }

    #[test]
    fn test_ordering() {
        let mut set = MigrationSet::new();
        set.register("m1700000002_b", Noop).unwrap();
        set.register("m1700000001_a", Noop).unwrap();
        set.register("m1700000003_c", Noop).unwrap();

        let up: Vec<_> = set.ordered(Direction::Up).into_iter().map(|(n, _)| n).collect();
        assert_eq!(up, ["m1700000001_a", "m1700000002_b", "m1700000003_c"]);

        let down: Vec<_> = set
            .ordered(Direction::Down)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(down, ["m1700000003_c", "m1700000002_b", "m1700000001_a"]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut set = MigrationSet::new();
        set.register("m1_users", Noop).unwrap();
        let err = set.register("m1_users", Noop).unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateMigration(name) if name == "m1_users"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut set = MigrationSet::new();
        assert!(set.is_empty());
        set.register("m1_users", Noop).unwrap();
        assert_eq!(
            format!("{set:?}"),
            "MigrationSet { migrations: [\"m1_users\"] }"
        );
    }
}

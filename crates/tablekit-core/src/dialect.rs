//! Dialect-specific column type rendering.
//!
//! The builder knows two backends. Everything dialect-dependent lives here
//! as a pure mapping from [`ColumnKind`] to SQL text, so the fragment
//! sequencing in [`crate::table`] never branches on the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fragment::ColumnKind;

/// Driver value that selects the Postgres dialect.
pub const POSTGRES_DRIVER: &str = "pgsql";

/// Target backend for rendered DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dialect {
    /// MySQL-like rendering (`AUTO_INCREMENT`, `INTEGER(11)`, `datetime`).
    #[default]
    Generic,
    /// Postgres rendering (`SERIAL`, `bigint`, `timestamp without time zone`).
    Postgres,
}

impl Dialect {
    /// Resolves a driver configuration value.
    ///
    /// Only `pgsql` (ignoring case and surrounding whitespace) selects
    /// [`Dialect::Postgres`]. Every other value, including an empty one,
    /// falls back to [`Dialect::Generic`].
    #[must_use]
    pub fn from_driver(driver: &str) -> Self {
        if driver.trim().eq_ignore_ascii_case(POSTGRES_DRIVER) {
            Self::Postgres
        } else {
            Self::Generic
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Postgres => "postgres",
        }
    }

    /// Returns the driver value that selects this dialect.
    #[must_use]
    pub const fn driver(self) -> &'static str {
        match self {
            Self::Generic => "mysql",
            Self::Postgres => POSTGRES_DRIVER,
        }
    }

    /// Maps a column kind to its SQL type.
    #[must_use]
    pub fn type_name(self, kind: &ColumnKind) -> String {
        match (self, kind) {
            (Self::Postgres, ColumnKind::Id) => "SERIAL".to_string(),
            (Self::Generic, ColumnKind::Id) => "INTEGER".to_string(),
            (_, ColumnKind::UnsignedInteger) => "INT".to_string(),
            (Self::Postgres, ColumnKind::Integer) => "bigint".to_string(),
            (Self::Generic, ColumnKind::Integer) => "INTEGER(11)".to_string(),
            (_, ColumnKind::String(len)) => format!("VARCHAR({len})"),
            (_, ColumnKind::Text) => "TEXT".to_string(),
            (
                Self::Postgres,
                ColumnKind::DateTime | ColumnKind::CreatedAt | ColumnKind::UpdatedAt,
            ) => "timestamp without time zone".to_string(),
            (
                Self::Generic,
                ColumnKind::DateTime | ColumnKind::CreatedAt | ColumnKind::UpdatedAt,
            ) => "datetime".to_string(),
        }
    }

    /// Returns the clause that follows the nullability marker of a primary key.
    #[must_use]
    pub const fn primary_key_clause(self) -> &'static str {
        match self {
            // Postgres gets its sequence from SERIAL.
            Self::Postgres => "PRIMARY KEY",
            Self::Generic => "PRIMARY KEY AUTO_INCREMENT",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_driver(s))
    }
}

impl From<String> for Dialect {
    fn from(driver: String) -> Self {
        Self::from_driver(&driver)
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.driver().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_driver() {
        assert_eq!(Dialect::from_driver("pgsql"), Dialect::Postgres);
        assert_eq!(Dialect::from_driver(" PGSQL "), Dialect::Postgres);
        assert_eq!(Dialect::from_driver("mysql"), Dialect::Generic);
        assert_eq!(Dialect::from_driver("postgres"), Dialect::Generic);
        assert_eq!(Dialect::from_driver(""), Dialect::Generic);
    }

    #[test]
    fn test_type_names() {
        let pg = Dialect::Postgres;
        let generic = Dialect::Generic;

        assert_eq!(pg.type_name(&ColumnKind::Id), "SERIAL");
        assert_eq!(generic.type_name(&ColumnKind::Id), "INTEGER");
        assert_eq!(pg.type_name(&ColumnKind::Integer), "bigint");
        assert_eq!(generic.type_name(&ColumnKind::Integer), "INTEGER(11)");
        assert_eq!(generic.type_name(&ColumnKind::UnsignedInteger), "INT");
        assert_eq!(pg.type_name(&ColumnKind::String(64)), "VARCHAR(64)");
        assert_eq!(
            pg.type_name(&ColumnKind::CreatedAt),
            "timestamp without time zone"
        );
        assert_eq!(generic.type_name(&ColumnKind::DateTime), "datetime");
    }

    #[test]
    fn test_serde_round_trip_uses_driver_names() {
        let json = serde_json::to_string(&Dialect::Postgres).unwrap();
        assert_eq!(json, "\"pgsql\"");

        let dialect: Dialect = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(dialect, Dialect::Generic);
    }

    #[test]
    fn test_parse_never_fails() {
        let dialect: Dialect = "anything".parse().unwrap();
        assert_eq!(dialect, Dialect::Generic);
    }
}

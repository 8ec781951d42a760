//! Structured column and constraint fragments.
//!
//! A fragment is one comma-separated segment of a `CREATE TABLE` body.
//! Modifiers mutate its fields directly; text is produced only when the
//! table is exported.

use crate::dialect::Dialect;
use crate::error::{Result, SchemaError};

/// Default VARCHAR length for [`crate::Table::string`].
pub const DEFAULT_STRING_LEN: u32 = 255;

/// Logical column type, rendered per dialect by [`Dialect::type_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Auto-increment primary key.
    Id,
    /// Plain integer column. Unsigned in name only.
    UnsignedInteger,
    /// Integer column whose width depends on the dialect.
    Integer,
    /// Variable-length character column.
    String(u32),
    /// Unbounded text column.
    Text,
    /// Timestamp column.
    DateTime,
    /// Creation timestamp of the timestamp pair.
    CreatedAt,
    /// Update timestamp of the timestamp pair.
    UpdatedAt,
}

impl ColumnKind {
    /// Returns whether this kind renders a primary key clause.
    #[must_use]
    pub const fn is_primary_key(self) -> bool {
        matches!(self, Self::Id)
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String default, rendered single-quoted.
    String(String),
    /// Integer default, rendered bare.
    Integer(i64),
    /// Raw SQL expression such as `NOW()`.
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Integer(i) => i.to_string(),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for DefaultValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Logical type.
    pub kind: ColumnKind,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether the column carries a UNIQUE clause.
    pub unique: bool,
}

impl Column {
    /// Creates a NOT NULL column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
            unique: false,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Renders the column for the given dialect.
    #[must_use]
    pub fn render(&self, dialect: Dialect) -> String {
        let mut sql = format!("{} {}", self.name, dialect.type_name(&self.kind));

        sql.push_str(if self.nullable { " NULL" } else { " NOT NULL" });

        if self.kind.is_primary_key() {
            sql.push(' ');
            sql.push_str(dialect.primary_key_clause());
        }

        if let Some(ref default) = self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }

        if self.unique {
            sql.push_str(" UNIQUE");
        }

        sql
    }
}

/// Progress of a foreign key through `foreign` -> `references` -> `on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyStage {
    /// Waiting for the referenced column.
    AwaitingReferences,
    /// Waiting for the referenced table.
    AwaitingOn,
    /// Both sides are known.
    Complete,
}

impl ForeignKeyStage {
    /// Name of the call that advances this stage.
    #[must_use]
    pub const fn expected_call(self) -> &'static str {
        match self {
            Self::AwaitingReferences => "references",
            Self::AwaitingOn => "on",
            Self::Complete => "cascade_on_delete",
        }
    }
}

/// A `CONSTRAINT FK_<col> FOREIGN KEY(<col>) ...` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Local column.
    pub column: String,
    /// Referenced column, set by `references`.
    pub references: Option<String>,
    /// Referenced table, set by `on`.
    pub table: Option<String>,
    /// Whether `ON DELETE CASCADE` is attached.
    pub cascade_on_delete: bool,
}

impl ForeignKey {
    /// Starts a foreign key on a local column.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            references: None,
            table: None,
            cascade_on_delete: false,
        }
    }

    /// Returns the construction stage.
    #[must_use]
    pub fn stage(&self) -> ForeignKeyStage {
        match (&self.references, &self.table) {
            (None, _) => ForeignKeyStage::AwaitingReferences,
            (Some(_), None) => ForeignKeyStage::AwaitingOn,
            (Some(_), Some(_)) => ForeignKeyStage::Complete,
        }
    }

    /// Renders the constraint.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IncompleteForeignKey`] if `references` or `on`
    /// was never called.
    pub fn render(&self) -> Result<String> {
        let (Some(column), Some(table)) = (&self.references, &self.table) else {
            return Err(SchemaError::IncompleteForeignKey {
                column: self.column.clone(),
                expected: self.stage().expected_call(),
            });
        };

        let mut sql = format!(
            "CONSTRAINT FK_{local} FOREIGN KEY({local}) REFERENCES {table}({column})",
            local = self.column
        );
        if self.cascade_on_delete {
            sql.push_str(" ON DELETE CASCADE");
        }
        Ok(sql)
    }
}

/// One segment of a table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A column definition.
    Column(Column),
    /// A foreign key constraint.
    ForeignKey(ForeignKey),
}

impl Fragment {
    /// Returns the column name this fragment is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Column(col) => &col.name,
            Self::ForeignKey(fk) => &fk.column,
        }
    }

    /// Renders the fragment for the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IncompleteForeignKey`] for an unfinished
    /// foreign key.
    pub fn render(&self, dialect: Dialect) -> Result<String> {
        match self {
            Self::Column(col) => Ok(col.render(dialect)),
            Self::ForeignKey(fk) => fk.render(),
        }
    }
}

impl From<Column> for Fragment {
    fn from(col: Column) -> Self {
        Self::Column(col)
    }
}

impl From<ForeignKey> for Fragment {
    fn from(fk: ForeignKey) -> Self {
        Self::ForeignKey(fk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::from(18).to_sql(), "18");
        assert_eq!(DefaultValue::from(-3_i64).to_sql(), "-3");
        assert_eq!(DefaultValue::from("admin").to_sql(), "'admin'");
        assert_eq!(DefaultValue::from("it's").to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Expression("NOW()".into()).to_sql(),
            "NOW()"
        );
    }

    #[test]
    fn test_column_clause_order() {
        let mut col = Column::new("email", ColumnKind::String(DEFAULT_STRING_LEN));
        col.unique = true;
        col.nullable = true;
        col.default = Some(DefaultValue::from("none"));

        assert_eq!(
            col.render(Dialect::Generic),
            "email VARCHAR(255) NULL DEFAULT 'none' UNIQUE"
        );
    }

    #[test]
    fn test_id_column() {
        let col = Column::new("id", ColumnKind::Id);
        assert_eq!(
            col.render(Dialect::Generic),
            "id INTEGER NOT NULL PRIMARY KEY AUTO_INCREMENT"
        );
        assert_eq!(col.render(Dialect::Postgres), "id SERIAL NOT NULL PRIMARY KEY");
    }

    #[test]
    fn test_foreign_key_stages() {
        let mut fk = ForeignKey::new("user_id");
        assert_eq!(fk.stage(), ForeignKeyStage::AwaitingReferences);

        fk.references = Some("id".into());
        assert_eq!(fk.stage(), ForeignKeyStage::AwaitingOn);
        assert_eq!(
            fk.render(),
            Err(SchemaError::IncompleteForeignKey {
                column: "user_id".into(),
                expected: "on",
            })
        );

        fk.table = Some("users".into());
        assert_eq!(fk.stage(), ForeignKeyStage::Complete);
        assert_eq!(
            fk.render().unwrap(),
            "CONSTRAINT FK_user_id FOREIGN KEY(user_id) REFERENCES users(id)"
        );
    }

    #[test]
    fn test_fragment_name() {
        let col: Fragment = Column::new("title", ColumnKind::Text).into();
        let fk: Fragment = ForeignKey::new("post_id").into();
        assert_eq!(col.name(), "title");
        assert_eq!(fk.name(), "post_id");
    }
}

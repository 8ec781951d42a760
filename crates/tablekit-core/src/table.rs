//! The `CREATE TABLE` fragment accumulator.
//!
//! [`Table`] keeps an ordered list of [`Fragment`]s. Column operations
//! append a fragment; modifiers rewrite the last one. [`Table::export`]
//! renders everything into one statement and clears the fragments so the
//! same builder can define the next table.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{Result, SchemaError};
use crate::fragment::{
    Column, ColumnKind, DEFAULT_STRING_LEN, DefaultValue, ForeignKey, ForeignKeyStage, Fragment,
};
use crate::ident;

/// Column names used by [`Table::timestamps`].
pub const CREATED_AT: &str = "create_at";
/// See [`CREATED_AT`].
pub const UPDATED_AT: &str = "update_at";

/// Fluent `CREATE TABLE` builder.
///
/// # Example
///
/// ```rust
/// use tablekit_core::{Dialect, Table};
///
/// let mut table = Table::new(Dialect::Generic);
/// table.set_table("posts")?;
/// table.id_default()?;
/// table.string("title")?.unique()?;
/// table.text("body")?.nullable()?;
/// table.foreign("user_id")?.references("id")?.on("users")?.cascade_on_delete()?;
///
/// assert_eq!(
///     table.export()?,
///     "CREATE TABLE IF NOT EXISTS posts (\
///      id INTEGER NOT NULL PRIMARY KEY AUTO_INCREMENT, \
///      title VARCHAR(255) NOT NULL UNIQUE, \
///      body TEXT NULL, \
///      CONSTRAINT FK_user_id FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE);"
/// );
/// # Ok::<(), tablekit_core::SchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    dialect: Dialect,
    strict: bool,
    name: Option<String>,
    fragments: Vec<Fragment>,
}

impl Table {
    /// Creates a permissive builder for the given dialect.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            strict: false,
            name: None,
            fragments: Vec::new(),
        }
    }

    /// Creates a builder that validates every identifier it is given.
    #[must_use]
    pub const fn strict(dialect: Dialect) -> Self {
        Self {
            dialect,
            strict: true,
            name: None,
            fragments: Vec::new(),
        }
    }

    /// Creates a permissive builder from a driver configuration value.
    #[must_use]
    pub fn for_driver(driver: &str) -> Self {
        Self::new(Dialect::from_driver(driver))
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns whether identifiers are validated.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the current table name.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the fragments accumulated since the last export.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Sets the target table. The name survives [`Table::export`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyTableName`] for an empty name, or
    /// [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn set_table(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }
        self.check_identifier(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    /// Forgets the table name and any pending fragments.
    pub fn reset(&mut self) {
        self.name = None;
        self.fragments.clear();
    }

    /// Appends a fragment.
    pub fn append(&mut self, fragment: impl Into<Fragment>) -> &mut Self {
        let fragment = fragment.into();
        debug!(fragment = fragment.name(), "Appending fragment");
        self.fragments.push(fragment);
        self
    }

    /// Returns the last fragment for in-place mutation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySequence`] if nothing was appended yet.
    pub fn last_mut(&mut self, modifier: &'static str) -> Result<&mut Fragment> {
        self.fragments
            .last_mut()
            .ok_or(SchemaError::EmptySequence { modifier })
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Appends an auto-increment primary key.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn id(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::Id)
    }

    /// Appends an auto-increment primary key named `id`.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps chaining uniform.
    pub fn id_default(&mut self) -> Result<&mut Self> {
        self.id("id")
    }

    /// Appends an `INT NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn unsigned_integer(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::UnsignedInteger)
    }

    /// Appends a `VARCHAR(255) NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn string(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.string_with_len(name, DEFAULT_STRING_LEN)
    }

    /// Appends a `VARCHAR(len) NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn string_with_len(&mut self, name: impl Into<String>, len: u32) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::String(len))
    }

    /// Appends an integer column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn integer(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::Integer)
    }

    /// Appends a `TEXT NOT NULL` column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn text(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::Text)
    }

    /// Appends a timestamp column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn date_time(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.column(name.into(), ColumnKind::DateTime)
    }

    /// Appends the `create_at` / `update_at` pair, both defaulting to `NOW()`.
    ///
    /// Modifiers called afterwards apply to `update_at`.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps chaining uniform.
    pub fn timestamps(&mut self) -> Result<&mut Self> {
        let now = DefaultValue::Expression("NOW()".to_string());
        self.append(Column::new(CREATED_AT, ColumnKind::CreatedAt).with_default(now.clone()));
        self.append(Column::new(UPDATED_AT, ColumnKind::UpdatedAt).with_default(now));
        Ok(self)
    }

    fn column(&mut self, name: String, kind: ColumnKind) -> Result<&mut Self> {
        self.check_identifier(&name)?;
        Ok(self.append(Column::new(name, kind)))
    }

    // =========================================================================
    // Column modifiers
    // =========================================================================

    /// Makes the last column nullable.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySequence`] or [`SchemaError::NotAColumn`].
    pub fn nullable(&mut self) -> Result<&mut Self> {
        self.last_column("nullable")?.nullable = true;
        Ok(self)
    }

    /// Sets the default of the last column.
    ///
    /// Strings are quoted, integers are not.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySequence`] or [`SchemaError::NotAColumn`].
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> Result<&mut Self> {
        self.last_column("default")?.default = Some(value.into());
        Ok(self)
    }

    /// Adds a UNIQUE clause to the last column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySequence`] or [`SchemaError::NotAColumn`].
    pub fn unique(&mut self) -> Result<&mut Self> {
        self.last_column("unique")?.unique = true;
        Ok(self)
    }

    fn last_column(&mut self, modifier: &'static str) -> Result<&mut Column> {
        match self.last_mut(modifier)? {
            Fragment::Column(col) => {
                debug!(column = %col.name, modifier, "Modifying column");
                Ok(col)
            }
            Fragment::ForeignKey(fk) => Err(SchemaError::NotAColumn {
                modifier,
                column: fk.column.clone(),
            }),
        }
    }

    // =========================================================================
    // Foreign keys
    // =========================================================================

    /// Starts a foreign key constraint on a local column.
    ///
    /// Must be followed by [`Table::references`] and [`Table::on`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] in strict mode.
    pub fn foreign(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.check_identifier(&name)?;
        Ok(self.append(ForeignKey::new(name)))
    }

    /// Sets the referenced column of the pending foreign key.
    ///
    /// # Errors
    ///
    /// Fails unless the last fragment is a foreign key awaiting `references`.
    pub fn references(&mut self, column: impl Into<String>) -> Result<&mut Self> {
        let column = column.into();
        let strict = self.strict;
        let fk = self.last_foreign_key("references", ForeignKeyStage::AwaitingReferences)?;
        if strict {
            ident::validate(&column)?;
        }
        fk.references = Some(column);
        Ok(self)
    }

    /// Sets the referenced table of the pending foreign key.
    ///
    /// # Errors
    ///
    /// Fails unless the last fragment is a foreign key awaiting `on`.
    pub fn on(&mut self, table: impl Into<String>) -> Result<&mut Self> {
        let table = table.into();
        let strict = self.strict;
        let fk = self.last_foreign_key("on", ForeignKeyStage::AwaitingOn)?;
        if strict {
            ident::validate(&table)?;
        }
        fk.table = Some(table);
        Ok(self)
    }

    /// Adds `ON DELETE CASCADE` to the completed foreign key.
    ///
    /// # Errors
    ///
    /// Fails unless the last fragment is a completed foreign key.
    pub fn cascade_on_delete(&mut self) -> Result<&mut Self> {
        self.last_foreign_key("cascade_on_delete", ForeignKeyStage::Complete)?
            .cascade_on_delete = true;
        Ok(self)
    }

    fn last_foreign_key(
        &mut self,
        modifier: &'static str,
        stage: ForeignKeyStage,
    ) -> Result<&mut ForeignKey> {
        match self.last_mut(modifier)? {
            Fragment::ForeignKey(fk) => {
                if fk.stage() == stage {
                    debug!(column = %fk.column, modifier, "Modifying foreign key");
                    Ok(fk)
                } else {
                    Err(SchemaError::ForeignKeyOutOfOrder {
                        modifier,
                        expected: fk.stage().expected_call(),
                        column: fk.column.clone(),
                    })
                }
            }
            Fragment::Column(col) => Err(SchemaError::MisplacedForeignKeyModifier {
                modifier,
                found: col.name.clone(),
            }),
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Renders `CREATE TABLE IF NOT EXISTS <table> (...);` and clears the
    /// fragments. The table name is kept.
    ///
    /// With no fragments the body is empty: `CREATE TABLE IF NOT EXISTS t ();`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingTableName`] before [`Table::set_table`],
    /// or [`SchemaError::IncompleteForeignKey`]. Fragments are kept on error.
    pub fn export(&mut self) -> Result<String> {
        let name = self.name.as_deref().ok_or(SchemaError::MissingTableName)?;

        let body = self
            .fragments
            .iter()
            .map(|f| f.render(self.dialect))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        let sql = format!("CREATE TABLE IF NOT EXISTS {name} ({body});");
        debug!(
            table = name,
            dialect = %self.dialect,
            fragments = self.fragments.len(),
            "Exported table"
        );

        self.fragments.clear();
        Ok(sql)
    }

    /// Renders `DROP TABLE IF EXISTS <table>;`. Fragments are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingTableName`] before [`Table::set_table`].
    pub fn drop_statement(&self) -> Result<String> {
        let name = self.name.as_deref().ok_or(SchemaError::MissingTableName)?;
        Ok(format!("DROP TABLE IF EXISTS {name};"))
    }

    fn check_identifier(&self, identifier: &str) -> Result<()> {
        if self.strict {
            ident::validate(identifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(name: &str) -> Table {
        let mut table = Table::new(Dialect::Generic);
        table.set_table(name).unwrap();
        table
    }

    #[test]
    fn test_string_export() {
        let mut table = generic("t");
        table.string("title").unwrap();
        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS t (title VARCHAR(255) NOT NULL);"
        );
    }

    #[test]
    fn test_export_resets_fragments() {
        let mut table = generic("t");
        table.string("title").unwrap();
        table.export().unwrap();

        assert!(table.fragments().is_empty());
        assert_eq!(table.table_name(), Some("t"));
        assert_eq!(table.export().unwrap(), "CREATE TABLE IF NOT EXISTS t ();");
    }

    #[test]
    fn test_nullable_only_touches_its_column() {
        let mut table = generic("t");
        table.string("bio").unwrap().nullable().unwrap();
        table.string("name").unwrap();

        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS t (bio VARCHAR(255) NULL, name VARCHAR(255) NOT NULL);"
        );
    }

    #[test]
    fn test_modifier_without_fragment() {
        let mut table = generic("t");
        assert_eq!(
            table.nullable().unwrap_err(),
            SchemaError::EmptySequence {
                modifier: "nullable"
            }
        );
        assert!(matches!(
            table.references("id"),
            Err(SchemaError::EmptySequence { .. })
        ));
    }

    #[test]
    fn test_foreign_key_modifier_after_column() {
        let mut table = generic("t");
        table.string("user_id").unwrap();

        assert_eq!(
            table.references("id").unwrap_err(),
            SchemaError::MisplacedForeignKeyModifier {
                modifier: "references",
                found: "user_id".into(),
            }
        );
        // The column is left intact.
        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS t (user_id VARCHAR(255) NOT NULL);"
        );
    }

    #[test]
    fn test_foreign_key_out_of_order() {
        let mut table = generic("t");
        table.foreign("user_id").unwrap();

        assert_eq!(
            table.on("users").unwrap_err(),
            SchemaError::ForeignKeyOutOfOrder {
                modifier: "on",
                expected: "references",
                column: "user_id".into(),
            }
        );
        assert!(matches!(
            table.cascade_on_delete(),
            Err(SchemaError::ForeignKeyOutOfOrder { .. })
        ));

        table.references("id").unwrap();
        assert!(matches!(
            table.references("id"),
            Err(SchemaError::ForeignKeyOutOfOrder { expected: "on", .. })
        ));
    }

    #[test]
    fn test_column_modifier_on_foreign_key() {
        let mut table = generic("t");
        table.foreign("user_id").unwrap();
        assert_eq!(
            table.unique().unwrap_err(),
            SchemaError::NotAColumn {
                modifier: "unique",
                column: "user_id".into(),
            }
        );
    }

    #[test]
    fn test_incomplete_foreign_key_keeps_fragments() {
        let mut table = generic("t");
        table.foreign("user_id").unwrap().references("id").unwrap();

        assert_eq!(
            table.export().unwrap_err(),
            SchemaError::IncompleteForeignKey {
                column: "user_id".into(),
                expected: "on",
            }
        );
        assert_eq!(table.fragments().len(), 1);

        table.on("users").unwrap();
        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS t (CONSTRAINT FK_user_id FOREIGN KEY(user_id) REFERENCES users(id));"
        );
    }

    #[test]
    fn test_missing_and_empty_table_name() {
        let mut table = Table::new(Dialect::Generic);
        assert_eq!(table.export().unwrap_err(), SchemaError::MissingTableName);
        assert_eq!(
            table.set_table("").unwrap_err(),
            SchemaError::EmptyTableName
        );
        assert_eq!(
            table.drop_statement().unwrap_err(),
            SchemaError::MissingTableName
        );
    }

    #[test]
    fn test_duplicate_columns_pass_through() {
        let mut table = generic("t");
        table.text("note").unwrap();
        table.text("note").unwrap();
        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS t (note TEXT NOT NULL, note TEXT NOT NULL);"
        );
    }

    #[test]
    fn test_strict_mode() {
        let mut table = Table::strict(Dialect::Postgres);
        assert!(table.is_strict());
        assert!(matches!(
            table.set_table("user accounts"),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
        table.set_table("accounts").unwrap();
        assert!(table.string("select").is_err());
        assert!(table.string("email").is_ok());
        assert_eq!(table.fragments().len(), 1);

        let mut permissive = generic("user accounts");
        assert!(permissive.string("select").is_ok());
    }

    #[test]
    fn test_strict_foreign_key_chain() {
        let mut table = Table::strict(Dialect::Generic);
        table.set_table("posts").unwrap();
        table.string("title").unwrap();
        assert_eq!(
            table.references("select").unwrap_err(),
            SchemaError::MisplacedForeignKeyModifier {
                modifier: "references",
                found: "title".into(),
            }
        );

        table.foreign("user_id").unwrap();
        assert_eq!(
            table.on("order").unwrap_err(),
            SchemaError::ForeignKeyOutOfOrder {
                modifier: "on",
                expected: "references",
                column: "user_id".into(),
            }
        );
        assert!(matches!(
            table.references("select"),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
        table.references("id").unwrap();
        assert!(matches!(
            table.on("order"),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
        table.on("users").unwrap().cascade_on_delete().unwrap();
        assert_eq!(
            table.export().unwrap(),
            "CREATE TABLE IF NOT EXISTS posts (title VARCHAR(255) NOT NULL, \
             CONSTRAINT FK_user_id FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE);"
        );
    }

    #[test]
    fn test_reset() {
        let mut table = generic("t");
        table.string("a").unwrap();
        table.reset();
        assert_eq!(table.table_name(), None);
        assert!(table.fragments().is_empty());
    }

    #[test]
    fn test_drop_statement() {
        let mut table = generic("users");
        table.string("name").unwrap();
        assert_eq!(
            table.drop_statement().unwrap(),
            "DROP TABLE IF EXISTS users;"
        );
        assert_eq!(table.fragments().len(), 1);
    }

    #[test]
    fn test_for_driver() {
        assert_eq!(Table::for_driver("pgsql").dialect(), Dialect::Postgres);
        assert_eq!(Table::for_driver("mysql").dialect(), Dialect::Generic);
    }
}

//! Skeleton file generation.
//!
//! Each [`ScaffoldKind`] owns a template with `{{struct}}`, `{{table}}` and
//! `{{name}}` placeholders. Migration files are prefixed with the creation
//! timestamp so that name order is creation order.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use heck::{ToSnakeCase, ToUpperCamelCase};
use tracing::info;

use crate::error::{MigrateError, Result};

const MIGRATION_TEMPLATE: &str = r#"use tablekit_core::{Result, Table};
use tablekit_migrate::Migration;

/// Registered as `{{name}}`.
pub struct {{struct}};

impl Migration for {{struct}} {
    fn up(&self, table: &mut Table) -> Result<String> {
        table.set_table("{{table}}")?;
        table.id_default()?;
        table.timestamps()?;
        table.export()
    }

    fn down(&self, table: &mut Table) -> Result<String> {
        table.set_table("{{table}}")?;
        table.drop_statement()
    }
}
"#;

const MODEL_TEMPLATE: &str = r#"/// Row of the `{{table}}` table.
#[derive(Debug, Clone)]
pub struct {{struct}} {
    pub id: i64,
}

impl {{struct}} {
    /// Table backing this model.
    pub const TABLE: &'static str = "{{table}}";
}
"#;

const SEEDER_TEMPLATE: &str = r#"use tablekit_core::Dialect;
use tablekit_migrate::{Seeder, StatementSink};

pub struct {{struct}};

impl Seeder for {{struct}} {
    fn run(&self, _dialect: Dialect, sink: &mut dyn StatementSink) -> anyhow::Result<()> {
        sink.apply("{{name}}", "INSERT INTO {{table}} DEFAULT VALUES;")?;
        Ok(())
    }
}
"#;

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScaffoldKind {
    /// A timestamped migration.
    Migration,
    /// A model struct.
    Model,
    /// A seeder.
    Seeder,
}

impl ScaffoldKind {
    /// Human-readable kind name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Model => "model",
            Self::Seeder => "seeder",
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::Migration => MIGRATION_TEMPLATE,
            Self::Model => MODEL_TEMPLATE,
            Self::Seeder => SEEDER_TEMPLATE,
        }
    }
}

/// A rendered skeleton, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// What was generated.
    pub kind: ScaffoldKind,
    /// File stem; for migrations also the registration name.
    pub file_stem: String,
    /// Generated struct name.
    pub struct_name: String,
    /// Table the skeleton refers to.
    pub table: String,
    /// File contents.
    pub contents: String,
}

impl Scaffold {
    /// Renders the template for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::MissingName`] if the name has no usable
    /// characters.
    pub fn render(kind: ScaffoldKind, name: &str, now: DateTime<Utc>) -> Result<Self> {
        let snake = normalize_name(name).ok_or(MigrateError::MissingName(kind.label()))?;
        let struct_name = snake.to_upper_camel_case();

        let (file_stem, table) = match kind {
            ScaffoldKind::Migration => (
                format!("m{}_{snake}", now.timestamp()),
                migration_table(&snake),
            ),
            // Models map to the lowercased name, without separators.
            ScaffoldKind::Model => (snake.clone(), struct_name.to_lowercase()),
            ScaffoldKind::Seeder => (snake.clone(), seeder_table(&snake)),
        };

        let contents = kind
            .template()
            .replace("{{struct}}", &struct_name)
            .replace("{{table}}", &table)
            .replace("{{name}}", &file_stem);

        Ok(Self {
            kind,
            file_stem,
            struct_name,
            table,
            contents,
        })
    }

    /// Path of the file inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.rs", self.file_stem))
    }

    /// Writes the file into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::FileExists`] instead of overwriting, or an IO
    /// error.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = self.path_in(dir);
        fs::create_dir_all(dir)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(MigrateError::FileExists(path));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(self.contents.as_bytes())?;
        info!("Created {}: {}", self.kind.label(), path.display());
        Ok(path)
    }
}

/// Snake-cases a user-supplied name and drops anything that is not a
/// valid identifier character. Returns `None` when nothing is left.
fn normalize_name(name: &str) -> Option<String> {
    let mut s: String = name
        .to_snake_case()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    while s.contains("__") {
        s = s.replace("__", "_");
    }
    let s = s.trim_matches('_');
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(s.to_string())
    }
}

/// `create_users_table` -> `users`.
fn migration_table(snake: &str) -> String {
    let table = snake.strip_prefix("create_").unwrap_or(snake);
    let table = table.strip_suffix("_table").unwrap_or(table);
    if table.is_empty() {
        snake.to_string()
    } else {
        table.to_string()
    }
}

/// `users_seeder` -> `users`.
fn seeder_table(snake: &str) -> String {
    match snake.strip_suffix("_seeder") {
        Some(table) if !table.is_empty() => table.to_string(),
        _ => snake.to_string(),
    }
}

//! The `tablekit` command line.
//!
//! Applications that compile their own migrations embed this console:
//!
//! ```rust,ignore
//! use clap::Parser;
//! use tablekit_migrate::console::{self, Cli};
//!
//! let cli = Cli::parse();
//! console::init_tracing(cli.verbose)?;
//! console::run(&cli, &app_migrations(), Some(&AppSeeder), &mut my_sink)?;
//! ```

use std::path::PathBuf;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use tablekit_core::Dialect;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::migrator::{Migrator, Seeder};
use crate::scaffold::{Scaffold, ScaffoldKind};
use crate::set::{Direction, MigrationSet};
use crate::sink::StatementSink;

/// Schema migrations and scaffolding.
#[derive(Debug, Parser)]
#[command(name = "tablekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database driver; `pgsql` selects Postgres, anything else the generic dialect.
    #[arg(short, long, env = "DB_DRIVER", default_value = "mysql")]
    pub driver: String,

    /// Migrations directory.
    #[arg(short, long, default_value = "database/schema")]
    pub migrations_dir: PathBuf,

    /// Validate table and column names.
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Console subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply every migration in ascending order.
    Migrate {
        /// Run the seeder afterwards.
        #[arg(long)]
        seed: bool,
    },

    /// Revert every migration in descending order.
    Rollback,

    /// Revert everything, then apply everything again.
    Refresh {
        /// Run the seeder afterwards.
        #[arg(long)]
        seed: bool,
    },

    /// Run the seeder only.
    Seed,

    /// List migrations with their forward statements.
    Status {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Generate a skeleton file.
    Make {
        /// What to generate.
        #[arg(value_enum)]
        kind: ScaffoldKind,

        /// Name of the migration, model or seeder.
        name: Option<String>,

        /// Target directory (defaults per kind).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Returns the dialect selected by `--driver`.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        let dialect = Dialect::from_driver(&self.driver);
        if dialect == Dialect::Generic && !self.driver.eq_ignore_ascii_case("mysql") {
            warn!(driver = %self.driver, "Unknown driver, using the generic dialect");
        }
        dialect
    }

    fn default_dir(&self, kind: ScaffoldKind) -> PathBuf {
        match kind {
            ScaffoldKind::Migration => self.migrations_dir.clone(),
            ScaffoldKind::Model => PathBuf::from("src/models"),
            ScaffoldKind::Seeder => PathBuf::from("database/seeders"),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Executes one console invocation.
///
/// # Errors
///
/// Returns the first migration, seeding or scaffolding failure.
pub fn run(
    cli: &Cli,
    set: &MigrationSet,
    seeder: Option<&dyn Seeder>,
    sink: &mut dyn StatementSink,
) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut migrator = Migrator::new(set, cli.dialect());
    if cli.strict {
        migrator = migrator.strict();
    }

    if set.is_empty() && !matches!(command, Commands::Make { .. } | Commands::Seed) {
        info!("No migrations registered. Use `make migration <name>` to create one.");
    }

    match command {
        Commands::Migrate { seed } => {
            migrator.migrate(sink)?;
            if *seed {
                seed_with(&migrator, seeder, sink)?;
            }
        }

        Commands::Rollback => {
            migrator.rollback(sink)?;
        }

        Commands::Refresh { seed } => {
            migrator.refresh(sink)?;
            if *seed {
                seed_with(&migrator, seeder, sink)?;
            }
        }

        Commands::Seed => seed_with(&migrator, seeder, sink)?,

        Commands::Status { json } => {
            let plan = migrator.plan(Direction::Up)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("\nMigrations ({}):", migrator.dialect());
                println!("{:-<60}", "");
                for report in &plan {
                    println!(" {}\n     {}", report.name, report.sql);
                }
                println!();
            }
        }

        Commands::Make { kind, name, dir } => {
            let name = name.as_deref().unwrap_or_default();
            let scaffold = Scaffold::render(*kind, name, Utc::now())?;
            let dir = dir.clone().unwrap_or_else(|| cli.default_dir(*kind));
            scaffold.write_to(&dir)?;
        }
    }

    Ok(())
}

fn seed_with(
    migrator: &Migrator<'_>,
    seeder: Option<&dyn Seeder>,
    sink: &mut dyn StatementSink,
) -> anyhow::Result<()> {
    match seeder {
        Some(seeder) => {
            migrator.seed(seeder, sink)?;
        }
        None => warn!("No seeder registered, skipping"),
    }
    Ok(())
}

//! tablekit CLI
//!
//! Scaffolds migration files and prints the statements of registered
//! migrations. This stock binary has no migrations compiled in; applications
//! embed [`tablekit_migrate::console`] with their own [`MigrationSet`].

use clap::Parser;

use tablekit_migrate::MigrationSet;
use tablekit_migrate::console::{self, Cli};
use tablekit_migrate::sink::PrintSink;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, DB_DRIVER may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    console::init_tracing(cli.verbose)?;

    let set = MigrationSet::new();
    console::run(&cli, &set, None, &mut PrintSink::stdout())
}

//! Example: Blog Application Schema
//!
//! Defines users, posts and comments as migrations and embeds the tablekit
//! console, so every subcommand works against this schema:
//!
//! ```bash
//! cargo run --example blog_schema -p tablekit-migrate -- --driver pgsql migrate --seed
//! cargo run --example blog_schema -p tablekit-migrate -- status --json
//! ```

use clap::Parser;
use tablekit_core::{Dialect, Table};
use tablekit_migrate::console::{self, Cli};
use tablekit_migrate::prelude::*;

// =============================================================================
// Migration Definitions
// =============================================================================

/// Initial migration: users
struct CreateUsers;

impl Migration for CreateUsers {
    fn up(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("users")?;
        table.id_default()?;
        table.string_with_len("username", 100)?.unique()?;
        table.string("email")?.unique()?;
        table.string("password_hash")?;
        table.timestamps()?;
        table.export()
    }

    fn down(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("users")?;
        table.drop_statement()
    }
}

/// Second migration: posts, owned by users
struct CreatePosts;

impl Migration for CreatePosts {
    fn up(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("posts")?;
        table.id_default()?;
        table.unsigned_integer("user_id")?;
        table.string("title")?;
        table.text("body")?;
        table.string_with_len("status", 20)?.default("draft")?;
        table.date_time("published_at")?.nullable()?;
        table.timestamps()?;
        table.foreign("user_id")?.references("id")?.on("users")?.cascade_on_delete()?;
        table.export()
    }

    fn down(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("posts")?;
        table.drop_statement()
    }
}

/// Third migration: comments on posts
struct CreateComments;

impl Migration for CreateComments {
    fn up(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("comments")?;
        table.id_default()?;
        table.unsigned_integer("post_id")?;
        table.unsigned_integer("user_id")?;
        table.text("content")?;
        table.integer("score")?.default(0)?;
        table.timestamps()?;
        table.foreign("post_id")?.references("id")?.on("posts")?.cascade_on_delete()?;
        table.foreign("user_id")?.references("id")?.on("users")?;
        table.export()
    }

    fn down(&self, table: &mut Table) -> tablekit_core::Result<String> {
        table.set_table("comments")?;
        table.drop_statement()
    }
}

// =============================================================================
// Seeder
// =============================================================================

struct BlogSeeder;

impl Seeder for BlogSeeder {
    fn run(&self, dialect: Dialect, sink: &mut dyn StatementSink) -> anyhow::Result<()> {
        let now = match dialect {
            Dialect::Postgres => "NOW()::timestamp",
            Dialect::Generic => "NOW()",
        };
        sink.apply(
            "blog_seeder",
            "INSERT INTO users (username, email, password_hash) \
             VALUES ('admin', 'admin@example.com', '');",
        )?;
        sink.apply(
            "blog_seeder",
            &format!(
                "INSERT INTO posts (user_id, title, body, status, published_at) \
                 VALUES (1, 'Hello', 'First post', 'published', {now});"
            ),
        )
    }
}

fn migrations() -> Result<MigrationSet> {
    let mut set = MigrationSet::new();
    set.register("m1700000000_create_users", CreateUsers)?
        .register("m1700000100_create_posts", CreatePosts)?
        .register("m1700000200_create_comments", CreateComments)?;
    Ok(set)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    console::init_tracing(cli.verbose)?;

    let set = migrations()?;
    console::run(&cli, &set, Some(&BlogSeeder), &mut PrintSink::stdout())
}

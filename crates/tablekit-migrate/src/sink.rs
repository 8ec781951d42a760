//! Destinations for rendered statements.
//!
//! Running SQL against a live database is left to the application: it
//! implements [`StatementSink`] on top of its own connection.

use std::io::{self, Write};

/// Receives every statement a run produces, in order.
pub trait StatementSink {
    /// Applies one statement on behalf of a migration or seeder.
    ///
    /// # Errors
    ///
    /// Any error aborts the run.
    fn apply(&mut self, source: &str, sql: &str) -> anyhow::Result<()>;
}

/// Writes each statement on its own line.
#[derive(Debug)]
pub struct PrintSink<W: Write = io::Stdout> {
    out: W,
}

impl PrintSink {
    /// Creates a sink that prints to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PrintSink<W> {
    /// Creates a sink that writes to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatementSink for PrintSink<W> {
    fn apply(&mut self, _source: &str, sql: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{sql}")?;
        Ok(())
    }
}

/// Keeps every statement in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// `(source, sql)` pairs in the order they were applied.
    pub statements: Vec<(String, String)>,
}

impl CollectSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns only the SQL text, in order.
    #[must_use]
    pub fn sql(&self) -> Vec<&str> {
        self.statements.iter().map(|(_, sql)| sql.as_str()).collect()
    }
}

impl StatementSink for CollectSink {
    fn apply(&mut self, source: &str, sql: &str) -> anyhow::Result<()> {
        self.statements.push((source.to_string(), sql.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_sink() {
        let mut sink = PrintSink::new(Vec::new());
        sink.apply("m1_users", "DROP TABLE IF EXISTS users;").unwrap();
        sink.apply("m2_posts", "DROP TABLE IF EXISTS posts;").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "DROP TABLE IF EXISTS users;\nDROP TABLE IF EXISTS posts;\n");
    }

    #[test]
    fn test_collect_sink() {
        let mut sink = CollectSink::new();
        sink.apply("m1_users", "SELECT 1;").unwrap();
        assert_eq!(sink.sql(), ["SELECT 1;"]);
        assert_eq!(sink.statements[0].0, "m1_users");
    }
}

//! Identifier checks for strict mode.
//!
//! Unquoted identifiers must match `[A-Za-z_][A-Za-z0-9_]*`, fit in 63
//! bytes and must not be a reserved word.

use crate::error::{Result, SchemaError};

/// Longest identifier both backends accept unquoted.
pub const MAX_IDENTIFIER_LEN: usize = 63;

const RESERVED_WORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
    "EXISTS", "FOREIGN", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INDEX", "INSERT", "INTO",
    "IS", "JOIN", "KEY", "LIKE", "LIMIT", "NOT", "NULL", "ON", "OR", "ORDER", "PRIMARY",
    "REFERENCES", "SELECT", "SET", "TABLE", "THEN", "TO", "UNION", "UNIQUE", "UPDATE",
    "USER", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

/// Validates an unquoted identifier.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidIdentifier`] describing the first rule the
/// identifier breaks.
pub fn validate(identifier: &str) -> Result<()> {
    let reject = |reason: &str| -> Result<()> {
        Err(SchemaError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        })
    };

    let mut chars = identifier.chars();
    match chars.next() {
        None => return reject("identifier is empty"),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return reject("must start with a letter or underscore");
        }
        Some(_) => {}
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return reject("only ASCII letters, digits and underscores are allowed");
    }

    if identifier.len() > MAX_IDENTIFIER_LEN {
        return reject(&format!("longer than {MAX_IDENTIFIER_LEN} characters"));
    }

    if is_reserved(identifier) {
        return reject("reserved word");
    }

    Ok(())
}

/// Returns whether the identifier is a reserved SQL keyword.
#[must_use]
pub fn is_reserved(identifier: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(identifier))
}

//! Schema for the persistent session store.

use rusqlite::Connection;

use crate::error::Result;

/// SQL to create the session key-value table.
pub const CREATE_SESSION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS session (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Initialize the schema on a fresh or existing database.
///
/// Idempotent: safe to run on every open.
///
/// # Errors
///
/// Returns an error if the DDL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_SESSION_TABLE, [])?;
    Ok(())
}
